//! Animal API handlers.
//!
//! ```text
//! POST /add-animal            multipart: siniiga, race, birthdate, birth_weight,
//!                             father?, mother?, photo?
//! GET /animals
//! GET /search-animal?siniiga=123
//! GET /api/animal-details/{id}
//! DELETE /api/delete-animal/{id}
//! ```

use std::path::Path;

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{delete, get, post, web};
use chrono::NaiveDate;
use futures_util::StreamExt as _;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{PhotoUpload, RegisterAnimalRequest};
use crate::domain::{
    Animal, AnimalDetail, AnimalDraft, AnimalSummary, AppliedVaccine, BirthWeight, Error, Race,
    Siniiga, parse_birthdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::MutationResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, animal_field_error, parse_number, require,
};

const SINIIGA: FieldName = FieldName::new("siniiga");
const RACE: FieldName = FieldName::new("race");
const BIRTHDATE: FieldName = FieldName::new("birthdate");
const BIRTH_WEIGHT: FieldName = FieldName::new("birth_weight");
const FATHER: FieldName = FieldName::new("father");
const MOTHER: FieldName = FieldName::new("mother");

/// Upper bound for an uploaded photo.
const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;
/// Upper bound for any text form field.
const MAX_TEXT_BYTES: usize = 1024;

/// Multipart form accepted by `POST /add-animal`. Documentation only; the
/// handler reads the stream field by field.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RegisterAnimalForm {
    #[schema(example = "MX-0001")]
    siniiga: String,
    #[schema(example = "Brahman")]
    race: String,
    #[schema(example = "2023-11-20")]
    birthdate: String,
    #[schema(example = "32.5")]
    birth_weight: String,
    /// Blank or absent means no recorded father.
    father: Option<String>,
    /// Blank or absent means no recorded mother.
    mother: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    photo: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
struct AnimalForm {
    siniiga: Option<String>,
    race: Option<String>,
    birthdate: Option<String>,
    birth_weight: Option<String>,
    father: Option<String>,
    mother: Option<String>,
    photo: Option<PhotoUpload>,
}

impl AnimalForm {
    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "siniiga" => &mut self.siniiga,
            "race" => &mut self.race,
            "birthdate" => &mut self.birthdate,
            "birth_weight" => &mut self.birth_weight,
            "father" => &mut self.father,
            "mother" => &mut self.mother,
            _ => return,
        };
        *slot = Some(value);
    }

    fn into_request(self) -> Result<RegisterAnimalRequest, Error> {
        let siniiga = Siniiga::new(require(self.siniiga, SINIIGA)?)
            .map_err(|err| animal_field_error(SINIIGA, &err))?;
        let race =
            Race::new(require(self.race, RACE)?).map_err(|err| animal_field_error(RACE, &err))?;
        let birthdate = parse_birthdate(&require(self.birthdate, BIRTHDATE)?)
            .map_err(|err| animal_field_error(BIRTHDATE, &err))?;
        let weight = parse_number(&require(self.birth_weight, BIRTH_WEIGHT)?, BIRTH_WEIGHT)?;
        let birth_weight =
            BirthWeight::new(weight).map_err(|err| animal_field_error(BIRTH_WEIGHT, &err))?;
        let father = Siniiga::optional(self.father.as_deref())
            .map_err(|err| animal_field_error(FATHER, &err))?;
        let mother = Siniiga::optional(self.mother.as_deref())
            .map_err(|err| animal_field_error(MOTHER, &err))?;

        Ok(RegisterAnimalRequest {
            draft: AnimalDraft {
                siniiga,
                race,
                birthdate,
                birth_weight,
                father,
                mother,
            },
            photo: self.photo,
        })
    }
}

fn multipart_error(error: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {error}"))
}

async fn read_field(field: &mut Field, limit: usize, name: &str) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(multipart_error)?;
        if buffer.len() + chunk.len() > limit {
            return Err(Error::invalid_request(format!(
                "{name} exceeds {limit} bytes"
            )));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

fn file_extension(file_name: Option<&str>) -> Option<String> {
    file_name
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .map(str::to_owned)
}

async fn read_animal_form(mut payload: Multipart) -> Result<AnimalForm, Error> {
    let mut form = AnimalForm::default();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(multipart_error)?;
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == "photo" {
            let file_name = field
                .content_disposition()
                .and_then(|disposition| disposition.get_filename())
                .map(str::to_owned);
            let bytes = read_field(&mut field, MAX_PHOTO_BYTES, "photo").await?;
            // Browsers submit an empty part for an untouched file input.
            if bytes.is_empty() {
                continue;
            }
            form.photo = Some(PhotoUpload {
                extension: file_extension(file_name.as_deref()),
                bytes,
            });
        } else {
            let bytes = read_field(&mut field, MAX_TEXT_BYTES, &name).await?;
            let value = String::from_utf8(bytes).map_err(|_| {
                Error::invalid_request(format!("{name} must be valid UTF-8"))
            })?;
            form.set_text(&name, value);
        }
    }
    Ok(form)
}

/// Register an animal with optional parents and photo.
#[utoipa::path(
    post,
    path = "/add-animal",
    request_body(content = RegisterAnimalForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Animal registered", body = MutationResponse),
        (status = 400, description = "Invalid fields, unknown parents, or duplicate siniiga", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["animals"],
    operation_id = "addAnimal",
    security([])
)]
#[post("/add-animal")]
pub async fn add_animal(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<web::Json<MutationResponse>> {
    let request = read_animal_form(payload).await?.into_request()?;
    let animal = state.animals.register(request).await?;
    Ok(web::Json(MutationResponse::ok(format!(
        "animal {} registered",
        animal.siniiga()
    ))))
}

/// List projection of an animal.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnimalSummaryDto {
    #[schema(example = "MX-0001")]
    pub siniiga: String,
    pub race: String,
    pub birthdate: NaiveDate,
    #[schema(example = "images/1704164645000-0b8f.jpg")]
    pub photo_path: Option<String>,
}

impl From<AnimalSummary> for AnimalSummaryDto {
    fn from(value: AnimalSummary) -> Self {
        Self {
            siniiga: value.siniiga.into(),
            race: value.race,
            birthdate: value.birthdate,
            photo_path: value.photo_path,
        }
    }
}

fn summaries(animals: Vec<AnimalSummary>) -> Vec<AnimalSummaryDto> {
    animals.into_iter().map(AnimalSummaryDto::from).collect()
}

/// List every animal.
#[utoipa::path(
    get,
    path = "/animals",
    responses(
        (status = 200, description = "Animals ordered by siniiga", body = [AnimalSummaryDto]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["animals"],
    operation_id = "listAnimals",
    security([])
)]
#[get("/animals")]
pub async fn list_animals(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<AnimalSummaryDto>>> {
    let animals = state.animals_query.list().await?;
    Ok(web::Json(summaries(animals)))
}

/// Query string for `GET /search-animal`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Literal substring of the siniiga; absent matches every animal.
    pub siniiga: Option<String>,
}

/// Find animals whose siniiga contains the given text.
#[utoipa::path(
    get,
    path = "/search-animal",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching animals", body = [AnimalSummaryDto]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["animals"],
    operation_id = "searchAnimals",
    security([])
)]
#[get("/search-animal")]
pub async fn search_animals(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<AnimalSummaryDto>>> {
    let fragment = query.into_inner().siniiga.unwrap_or_default();
    let animals = state.animals_query.search(&fragment).await?;
    Ok(web::Json(summaries(animals)))
}

/// Full animal record.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnimalRecordDto {
    pub siniiga: String,
    pub race: String,
    pub birthdate: NaiveDate,
    pub birth_weight: f64,
    pub photo_path: Option<String>,
    pub father: Option<String>,
    pub mother: Option<String>,
}

impl From<&Animal> for AnimalRecordDto {
    fn from(animal: &Animal) -> Self {
        Self {
            siniiga: animal.siniiga().to_string(),
            race: animal.race().as_ref().to_owned(),
            birthdate: animal.birthdate(),
            birth_weight: animal.birth_weight().get(),
            photo_path: animal.photo_path().map(str::to_owned),
            father: animal.father().map(ToString::to_string),
            mother: animal.mother().map(ToString::to_string),
        }
    }
}

/// One vaccine administered to an animal.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedVaccineDto {
    pub vaccine_name: String,
    pub application_date: NaiveDate,
    /// Dose in millilitres.
    pub ml: f64,
}

impl From<AppliedVaccine> for AppliedVaccineDto {
    fn from(value: AppliedVaccine) -> Self {
        Self {
            vaccine_name: value.vaccine_name,
            application_date: value.application_date,
            ml: value.dose,
        }
    }
}

/// Response body for `GET /api/animal-details/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnimalDetailResponse {
    pub animal: AnimalRecordDto,
    /// Applications ordered by date; empty when none were recorded.
    pub vaccines: Vec<AppliedVaccineDto>,
}

impl From<AnimalDetail> for AnimalDetailResponse {
    fn from(detail: AnimalDetail) -> Self {
        Self {
            animal: AnimalRecordDto::from(&detail.animal),
            vaccines: detail
                .vaccines
                .into_iter()
                .map(AppliedVaccineDto::from)
                .collect(),
        }
    }
}

/// Fetch an animal together with its vaccination history.
#[utoipa::path(
    get,
    path = "/api/animal-details/{id}",
    params(("id" = String, Path, description = "Animal siniiga")),
    responses(
        (status = 200, description = "Animal and vaccines", body = AnimalDetailResponse),
        (status = 404, description = "Animal not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["animals"],
    operation_id = "animalDetails",
    security([])
)]
#[get("/api/animal-details/{id}")]
pub async fn animal_details(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AnimalDetailResponse>> {
    let detail = state.animals_query.detail(&path.into_inner()).await?;
    Ok(web::Json(AnimalDetailResponse::from(detail)))
}

/// Delete an animal. Children keep their records with the parent cleared;
/// the animal's vaccination history is removed with it.
#[utoipa::path(
    delete,
    path = "/api/delete-animal/{id}",
    params(("id" = String, Path, description = "Animal siniiga")),
    responses(
        (status = 200, description = "Animal deleted", body = MutationResponse),
        (status = 404, description = "Animal not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["animals"],
    operation_id = "deleteAnimal",
    security([])
)]
#[delete("/api/delete-animal/{id}")]
pub async fn delete_animal(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MutationResponse>> {
    let siniiga = path.into_inner();
    state.animals.delete(&siniiga).await?;
    Ok(web::Json(MutationResponse::ok(format!(
        "animal {siniiga} deleted"
    ))))
}

#[cfg(test)]
#[path = "animals_tests.rs"]
mod tests;
