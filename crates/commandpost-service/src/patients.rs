//! Patient orchestrators.
//!
//! Patients have two unrelated deletion notions. The user-facing delete
//! flips `status` to `Deleted` and leaves the row live; the row tombstone
//! is a system-level deletion (cascade from a collection point delete).
//! Restoring the row does not reset `status`.

use commandpost_core::{
    Ambulance, Change, CollectionPoint, EntityKind, Hospital, NewPatient, Patient, PatientId,
    PatientPatch, PatientStatus, Role,
};
use commandpost_storage::{PatientFilter, Visibility};

use crate::error::ServiceError;
use crate::validate::ensure_exists;
use crate::{CommandService, acl};

impl CommandService {
    pub async fn list_patients(&self) -> Result<Vec<Patient>, ServiceError> {
        Ok(self.store().patients().find_all(Visibility::Live).await?)
    }

    pub async fn get_patient(&self, id: PatientId) -> Result<Option<Patient>, ServiceError> {
        Ok(self
            .store()
            .patients()
            .find_by_id(id, Visibility::Live)
            .await?)
    }

    /// Registers a patient. The collection point is mandatory; hospital
    /// and ambulance references are validated only when supplied.
    pub async fn add_patient(
        &self,
        caller: Option<Role>,
        new: NewPatient,
    ) -> Result<Patient, ServiceError> {
        self.gate().check(caller, acl::PATIENT_MANAGE)?;
        ensure_exists(
            self.store().collection_points(),
            new.collection_point_id,
            Visibility::Live,
        )
        .await?;
        if let Some(hospital_id) = new.hospital_id {
            ensure_exists(self.store().hospitals(), hospital_id, Visibility::Live).await?;
        }
        if let Some(ambulance_id) = new.ambulance_id {
            ensure_exists(self.store().ambulances(), ambulance_id, Visibility::Live).await?;
        }

        let scope = self.store().begin().await?;
        let patient = self.store().patients().insert(new).await?;
        scope.commit().await?;
        Ok(patient)
    }

    /// Updates a patient. An omitted optional reference leaves the
    /// association unchanged; an explicit null clears it. Supplied
    /// references are validated before the write.
    pub async fn update_patient(
        &self,
        caller: Option<Role>,
        id: PatientId,
        patch: PatientPatch,
    ) -> Result<Patient, ServiceError> {
        self.gate().check(caller, acl::PATIENT_MANAGE)?;
        ensure_exists(self.store().patients(), id, Visibility::Live).await?;
        if let Change::Set(collection_point_id) = patch.collection_point_id {
            ensure_exists(
                self.store().collection_points(),
                collection_point_id,
                Visibility::Live,
            )
            .await?;
        }
        if let Change::Set(Some(hospital_id)) = patch.hospital_id {
            ensure_exists(self.store().hospitals(), hospital_id, Visibility::Live).await?;
        }
        if let Change::Set(Some(ambulance_id)) = patch.ambulance_id {
            ensure_exists(self.store().ambulances(), ambulance_id, Visibility::Live).await?;
        }

        let scope = self.store().begin().await?;
        let affected = self.store().patients().update(id, patch).await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::Patient, id));
        }
        scope.commit().await?;

        self.require_patient(id).await
    }

    /// User-facing delete: sets `status` to `Deleted` without tombstoning
    /// the row.
    pub async fn delete_patient(
        &self,
        caller: Option<Role>,
        id: PatientId,
    ) -> Result<bool, ServiceError> {
        self.gate().check(caller, acl::PATIENT_MANAGE)?;

        let scope = self.store().begin().await?;
        let affected = self
            .store()
            .patients()
            .update(id, PatientPatch::status(PatientStatus::Deleted))
            .await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::Patient, id));
        }
        scope.commit().await?;
        Ok(true)
    }

    /// Row-level restore. Independent of `status`: a patient deleted by a
    /// user keeps status `Deleted` after the row comes back.
    pub async fn restore_patient(
        &self,
        caller: Option<Role>,
        id: PatientId,
    ) -> Result<Patient, ServiceError> {
        self.gate().check(caller, acl::PATIENT_MANAGE)?;

        let scope = self.store().begin().await?;
        self.store()
            .patients()
            .restore(&PatientFilter::by_id(id))
            .await?;
        scope.commit().await?;

        self.require_patient(id).await
    }

    /// The patient's collection point, also resolving tombstoned ones so a
    /// registered patient never dangles.
    pub async fn collection_point_of(
        &self,
        patient: &Patient,
    ) -> Result<Option<CollectionPoint>, ServiceError> {
        Ok(self
            .store()
            .collection_points()
            .find_by_id(patient.collection_point_id, Visibility::IncludeDeleted)
            .await?)
    }

    pub async fn hospital_of(&self, patient: &Patient) -> Result<Option<Hospital>, ServiceError> {
        match patient.hospital_id {
            Some(id) => Ok(self
                .store()
                .hospitals()
                .find_by_id(id, Visibility::Live)
                .await?),
            None => Ok(None),
        }
    }

    pub async fn ambulance_of(&self, patient: &Patient) -> Result<Option<Ambulance>, ServiceError> {
        match patient.ambulance_id {
            Some(id) => Ok(self
                .store()
                .ambulances()
                .find_by_id(id, Visibility::Live)
                .await?),
            None => Ok(None),
        }
    }

    async fn require_patient(&self, id: PatientId) -> Result<Patient, ServiceError> {
        self.store()
            .patients()
            .find_by_id(id, Visibility::Live)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Patient, id))
    }
}
