//! In-memory record store.
//!
//! Implements the animal, vaccine, and user repository ports over a single
//! mutex-guarded state so every operation is atomic. Key and reference rules
//! mirror the PostgreSQL schema:
//! - animal tags, vaccine names, and usernames are unique;
//! - parents must exist at insert and are cleared when the parent is deleted;
//! - deleting an animal deletes its vaccine applications;
//! - renaming a vaccine renames it in recorded applications.
//!
//! Used when no database is configured and throughout the test suites.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    AnimalRepository, AnimalRepositoryError, UserRepository, UserRepositoryError,
    VaccineRepository, VaccineRepositoryError,
};
use crate::domain::{
    Account, Animal, AnimalDetail, AnimalSummary, AppliedVaccine, Siniiga, Username,
    VaccineApplication, VaccineName,
};

#[derive(Debug, Clone)]
struct StoredApplication {
    id: u64,
    siniiga: Siniiga,
    vaccine_name: String,
    dose: f64,
    application_date: NaiveDate,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<String, Account>,
    animals: BTreeMap<Siniiga, Animal>,
    vaccines: BTreeMap<String, VaccineName>,
    applications: Vec<StoredApplication>,
    next_application_id: u64,
}

/// Mutex-guarded store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: Mutex<State>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "record store mutex poisoned".to_owned())
    }
}

impl State {
    fn summaries<'a>(animals: impl Iterator<Item = &'a Animal>) -> Vec<AnimalSummary> {
        animals.map(Animal::summary).collect()
    }
}

#[async_trait]
impl AnimalRepository for InMemoryRecordStore {
    async fn find_existing(&self, ids: &[Siniiga]) -> Result<Vec<Siniiga>, AnimalRepositoryError> {
        let state = self.lock().map_err(AnimalRepositoryError::query)?;
        let found: BTreeSet<Siniiga> = ids
            .iter()
            .filter(|id| state.animals.contains_key(*id))
            .cloned()
            .collect();
        Ok(found.into_iter().collect())
    }

    async fn insert(&self, animal: &Animal) -> Result<(), AnimalRepositoryError> {
        let mut state = self.lock().map_err(AnimalRepositoryError::query)?;
        if state.animals.contains_key(animal.siniiga()) {
            return Err(AnimalRepositoryError::duplicate(animal.siniiga().as_ref()));
        }
        for parent in [animal.father(), animal.mother()].into_iter().flatten() {
            if !state.animals.contains_key(parent) {
                return Err(AnimalRepositoryError::unknown_parent(parent.as_ref()));
            }
        }
        state
            .animals
            .insert(animal.siniiga().clone(), animal.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AnimalSummary>, AnimalRepositoryError> {
        let state = self.lock().map_err(AnimalRepositoryError::query)?;
        Ok(State::summaries(state.animals.values()))
    }

    async fn search(&self, fragment: &str) -> Result<Vec<AnimalSummary>, AnimalRepositoryError> {
        let state = self.lock().map_err(AnimalRepositoryError::query)?;
        Ok(State::summaries(
            state
                .animals
                .values()
                .filter(|animal| animal.siniiga().as_ref().contains(fragment)),
        ))
    }

    async fn find_detail(
        &self,
        siniiga: &Siniiga,
    ) -> Result<Option<AnimalDetail>, AnimalRepositoryError> {
        let state = self.lock().map_err(AnimalRepositoryError::query)?;
        let Some(animal) = state.animals.get(siniiga) else {
            return Ok(None);
        };
        let mut history: Vec<&StoredApplication> = state
            .applications
            .iter()
            .filter(|application| &application.siniiga == siniiga)
            .collect();
        history.sort_by_key(|application| (application.application_date, application.id));
        let vaccines = history
            .into_iter()
            .map(|application| AppliedVaccine {
                vaccine_name: application.vaccine_name.clone(),
                application_date: application.application_date,
                dose: application.dose,
            })
            .collect();
        Ok(Some(AnimalDetail {
            animal: animal.clone(),
            vaccines,
        }))
    }

    async fn delete(&self, siniiga: &Siniiga) -> Result<bool, AnimalRepositoryError> {
        let mut state = self.lock().map_err(AnimalRepositoryError::query)?;
        if state.animals.remove(siniiga).is_none() {
            return Ok(false);
        }
        for animal in state.animals.values_mut() {
            animal.detach_parent(siniiga);
        }
        state
            .applications
            .retain(|application| &application.siniiga != siniiga);
        Ok(true)
    }
}

#[async_trait]
impl VaccineRepository for InMemoryRecordStore {
    async fn insert(&self, name: &VaccineName) -> Result<(), VaccineRepositoryError> {
        let mut state = self.lock().map_err(VaccineRepositoryError::query)?;
        if state.vaccines.contains_key(name.as_ref()) {
            return Err(VaccineRepositoryError::duplicate(name.as_ref()));
        }
        state
            .vaccines
            .insert(name.as_ref().to_owned(), name.clone());
        Ok(())
    }

    async fn rename(&self, old: &str, new: &VaccineName) -> Result<bool, VaccineRepositoryError> {
        let mut state = self.lock().map_err(VaccineRepositoryError::query)?;
        if !state.vaccines.contains_key(old) {
            return Ok(false);
        }
        if old != new.as_ref() && state.vaccines.contains_key(new.as_ref()) {
            return Err(VaccineRepositoryError::duplicate(new.as_ref()));
        }
        state.vaccines.remove(old);
        state
            .vaccines
            .insert(new.as_ref().to_owned(), new.clone());
        for application in &mut state.applications {
            if application.vaccine_name == old {
                application.vaccine_name = new.as_ref().to_owned();
            }
        }
        Ok(true)
    }

    async fn exists(&self, name: &str) -> Result<bool, VaccineRepositoryError> {
        let state = self.lock().map_err(VaccineRepositoryError::query)?;
        Ok(state.vaccines.contains_key(name))
    }

    async fn list(&self) -> Result<Vec<VaccineName>, VaccineRepositoryError> {
        let state = self.lock().map_err(VaccineRepositoryError::query)?;
        Ok(state.vaccines.values().cloned().collect())
    }

    async fn record_application(
        &self,
        application: &VaccineApplication,
    ) -> Result<(), VaccineRepositoryError> {
        let mut state = self.lock().map_err(VaccineRepositoryError::query)?;
        if !state.animals.contains_key(&application.siniiga) {
            return Err(VaccineRepositoryError::unknown_reference(format!(
                "animal {}",
                application.siniiga
            )));
        }
        if !state
            .vaccines
            .contains_key(application.vaccine_name.as_ref())
        {
            return Err(VaccineRepositoryError::unknown_reference(format!(
                "vaccine {}",
                application.vaccine_name
            )));
        }
        state.next_application_id += 1;
        let id = state.next_application_id;
        state.applications.push(StoredApplication {
            id,
            siniiga: application.siniiga.clone(),
            vaccine_name: application.vaccine_name.as_ref().to_owned(),
            dose: application.dose.get(),
            application_date: application.application_date,
        });
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRecordStore {
    async fn insert(&self, account: &Account) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        let key = account.username.as_ref().to_owned();
        if state.users.contains_key(&key) {
            return Err(UserRepositoryError::duplicate(key));
        }
        state.users.insert(key, account.clone());
        Ok(())
    }

    async fn find(&self, username: &Username) -> Result<Option<Account>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(username.as_ref()).cloned())
    }
}
