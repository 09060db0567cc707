//! Vaccine catalogue API handlers.
//!
//! ```text
//! POST /add-vaccine {"name":"BVD"}
//! PUT /update-vaccine {"oldName":"BVD","newName":"BVD-PI3"}
//! POST /add-applied-vaccine {"animal_siniiga":"MX-1","vaccine_name":"BVD","dose":2,"date_applied":"2024-02-01"}
//! GET /vaccines
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Dose, Error, Siniiga, VaccineApplication, VaccineName, parse_application_date,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::MutationResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumericInput, animal_field_error, missing_field_error, require,
    vaccine_field_error,
};

const ANIMAL_SINIIGA: FieldName = FieldName::new("animal_siniiga");
const VACCINE_NAME: FieldName = FieldName::new("vaccine_name");
const DOSE: FieldName = FieldName::new("dose");
const DATE_APPLIED: FieldName = FieldName::new("date_applied");

/// Request body for `POST /add-vaccine`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddVaccineRequest {
    #[serde(default)]
    #[schema(example = "BVD")]
    pub name: String,
}

/// Add a vaccine type to the catalogue.
#[utoipa::path(
    post,
    path = "/add-vaccine",
    request_body = AddVaccineRequest,
    responses(
        (status = 200, description = "Vaccine added", body = MutationResponse),
        (status = 400, description = "Name too short or already catalogued", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vaccines"],
    operation_id = "addVaccine",
    security([])
)]
#[post("/add-vaccine")]
pub async fn add_vaccine(
    state: web::Data<HttpState>,
    payload: web::Json<AddVaccineRequest>,
) -> ApiResult<web::Json<MutationResponse>> {
    let name = state.vaccines.add(&payload.name).await?;
    Ok(web::Json(MutationResponse::ok(format!("vaccine {name} added"))))
}

/// Request body for `PUT /update-vaccine`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVaccineRequest {
    #[serde(default)]
    #[schema(example = "BVD")]
    pub old_name: String,
    #[serde(default)]
    #[schema(example = "BVD-PI3")]
    pub new_name: String,
}

/// Rename a vaccine; recorded applications follow the new name.
#[utoipa::path(
    put,
    path = "/update-vaccine",
    request_body = UpdateVaccineRequest,
    responses(
        (status = 200, description = "Vaccine renamed", body = MutationResponse),
        (status = 400, description = "New name too short or already in use", body = ErrorSchema),
        (status = 404, description = "Old name not catalogued", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vaccines"],
    operation_id = "updateVaccine",
    security([])
)]
#[put("/update-vaccine")]
pub async fn update_vaccine(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateVaccineRequest>,
) -> ApiResult<web::Json<MutationResponse>> {
    let UpdateVaccineRequest { old_name, new_name } = payload.into_inner();
    let renamed = state.vaccines.rename(&old_name, &new_name).await?;
    Ok(web::Json(MutationResponse::ok(format!(
        "vaccine {} renamed to {renamed}",
        old_name.trim()
    ))))
}

/// Request body for `POST /add-applied-vaccine`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyVaccineRequest {
    #[schema(example = "MX-1")]
    pub animal_siniiga: Option<String>,
    #[schema(example = "BVD")]
    pub vaccine_name: Option<String>,
    /// Dose in millilitres, as a number or numeric text.
    #[schema(value_type = f64, example = 2.5)]
    pub dose: Option<NumericInput>,
    #[schema(example = "2024-02-01")]
    pub date_applied: Option<String>,
}

impl TryFrom<ApplyVaccineRequest> for VaccineApplication {
    type Error = Error;

    fn try_from(value: ApplyVaccineRequest) -> Result<Self, Self::Error> {
        let siniiga = Siniiga::new(require(value.animal_siniiga, ANIMAL_SINIIGA)?)
            .map_err(|err| animal_field_error(ANIMAL_SINIIGA, &err))?;
        let vaccine_name = VaccineName::new(require(value.vaccine_name, VACCINE_NAME)?)
            .map_err(|err| vaccine_field_error(VACCINE_NAME, &err))?;
        let dose = value
            .dose
            .ok_or_else(|| missing_field_error(DOSE))?
            .parse(DOSE)?;
        let dose = Dose::new(dose).map_err(|err| vaccine_field_error(DOSE, &err))?;
        let application_date = parse_application_date(&require(value.date_applied, DATE_APPLIED)?)
            .map_err(|err| vaccine_field_error(DATE_APPLIED, &err))?;
        Ok(Self {
            siniiga,
            vaccine_name,
            dose,
            application_date,
        })
    }
}

/// Record that an animal received a dose of a catalogued vaccine.
#[utoipa::path(
    post,
    path = "/add-applied-vaccine",
    request_body = ApplyVaccineRequest,
    responses(
        (status = 200, description = "Application recorded", body = MutationResponse),
        (status = 400, description = "Invalid fields or unknown animal/vaccine", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vaccines"],
    operation_id = "addAppliedVaccine",
    security([])
)]
#[post("/add-applied-vaccine")]
pub async fn add_applied_vaccine(
    state: web::Data<HttpState>,
    payload: web::Json<ApplyVaccineRequest>,
) -> ApiResult<web::Json<MutationResponse>> {
    let application = VaccineApplication::try_from(payload.into_inner())?;
    state.vaccines.apply(application).await?;
    Ok(web::Json(MutationResponse::ok("vaccine application recorded")))
}

/// Catalogue entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct VaccineDto {
    #[schema(example = "BVD")]
    pub name: String,
}

/// List the vaccine catalogue.
#[utoipa::path(
    get,
    path = "/vaccines",
    responses(
        (status = 200, description = "Catalogue ordered by name", body = [VaccineDto]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["vaccines"],
    operation_id = "listVaccines",
    security([])
)]
#[get("/vaccines")]
pub async fn list_vaccines(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<VaccineDto>>> {
    let names = state.vaccines_query.list().await?;
    Ok(web::Json(
        names
            .into_iter()
            .map(|name| VaccineDto {
                name: name.to_string(),
            })
            .collect(),
    ))
}
