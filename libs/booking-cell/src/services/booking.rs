// libs/booking-cell/src/services/booking.rs
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use provider_cell::models::{ApprovalStatus, Facility, Provider};
use shared_config::AppConfig;
use shared_database::postgrest::{prefer_return_representation, PostgrestClient, StoreError};

use crate::models::{
    Appointment, AppointmentStatus, AppointmentView, BookAppointmentRequest, BookingError,
};

/// Fallback stored when a booking arrives with a blank or missing reason.
const UNSTATED_REASON: &str = "Unstated";

/// Books and cancels appointments.
///
/// The double-booking guarantee lives in the store: `appointments` carries a
/// unique index over (provider_id, date, time) restricted to rows still in
/// `scheduled` state, so the insert below either commits the single winner or
/// fails closed with a constraint violation. There is deliberately no
/// lookup-before-insert, and cancelled rows never block rebooking the slot.
pub struct BookingService {
    store: PostgrestClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: PostgrestClient::new(config),
        }
    }

    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<AppointmentView, BookingError> {
        let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDate)?;
        let time = NaiveTime::parse_from_str(&request.time, "%H:%M")
            .map_err(|_| BookingError::InvalidTime)?;
        let reason = match request.reason {
            Some(reason) if !reason.trim().is_empty() => reason,
            _ => UNSTATED_REASON.to_string(),
        };

        info!(
            "Booking request: patient {} with provider {} on {} at {}",
            request.patient_id, request.provider_id, date, time
        );

        self.verify_patient_exists(request.patient_id).await?;
        // Approval and slot existence are independent gates; an unapproved
        // provider is rejected here exactly like a missing one.
        let provider = self.bookable_provider(request.provider_id).await?;

        let appointment_data = json!({
            "patient_id": request.patient_id,
            "provider_id": request.provider_id,
            "date": date.format("%Y-%m-%d").to_string(),
            "time": time.format("%H:%M:%S").to_string(),
            "status": AppointmentStatus::Scheduled.to_string(),
            "reason": reason,
            "created_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Appointment> = match self
            .store
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(appointment_data),
                Some(prefer_return_representation()),
            )
            .await
        {
            Ok(result) => result,
            Err(StoreError::UniqueViolation(detail)) => {
                warn!(
                    "Slot contention: provider {} on {} at {}: {}",
                    request.provider_id, date, time, detail
                );
                return Err(BookingError::SlotTaken {
                    date: request.date,
                    time: request.time,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let appointment = result
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no representation".to_string()))?;

        // Display join runs after the committed write, outside the atomic section.
        let facility = self.facility_name(provider.facility_id).await?;

        info!(
            "Appointment {} booked with provider {}",
            appointment.id, provider.id
        );
        Ok(AppointmentView::compose(appointment, &provider, facility))
    }

    /// Soft-cancel. Flips `scheduled` to `cancelled`; cancelling again is an
    /// error, not a no-op.
    pub async fn cancel(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        debug!("Cancelling appointment {}", appointment_id);

        // Conditional flip: only a row still in scheduled state is touched,
        // so a repeated cancel comes back empty instead of silently passing.
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&status=eq.scheduled",
            appointment_id
        );
        let result: Vec<Appointment> = self
            .store
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "status": AppointmentStatus::Cancelled.to_string() })),
                Some(prefer_return_representation()),
            )
            .await?;

        if let Some(appointment) = result.into_iter().next() {
            info!("Appointment {} cancelled", appointment_id);
            return Ok(appointment);
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let existing: Vec<Appointment> = self.store.request(Method::GET, &path, None).await?;
        match existing.into_iter().next() {
            Some(_) => Err(BookingError::AlreadyCancelled),
            None => Err(BookingError::NotFound),
        }
    }

    /// All of a patient's appointments, oldest first, with the same
    /// denormalised join the booking response uses.
    pub async fn patient_appointments(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<AppointmentView>, BookingError> {
        self.verify_patient_exists(patient_id).await?;

        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&order=date.asc,time.asc",
            patient_id
        );
        let appointments: Vec<Appointment> = self.store.request(Method::GET, &path, None).await?;
        if appointments.is_empty() {
            return Ok(Vec::new());
        }

        let mut provider_ids: Vec<Uuid> = appointments.iter().map(|a| a.provider_id).collect();
        provider_ids.sort_unstable();
        provider_ids.dedup();

        let ids = provider_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let providers: Vec<Provider> = self
            .store
            .request(Method::GET, &format!("/rest/v1/providers?id=in.({})", ids), None)
            .await?;

        let mut facility_ids: Vec<Uuid> = providers.iter().map(|p| p.facility_id).collect();
        facility_ids.sort_unstable();
        facility_ids.dedup();

        let facility_names: HashMap<Uuid, String> = if facility_ids.is_empty() {
            HashMap::new()
        } else {
            let ids = facility_ids
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let facilities: Vec<Facility> = self
                .store
                .request(Method::GET, &format!("/rest/v1/facilities?id=in.({})", ids), None)
                .await?;
            facilities.into_iter().map(|f| (f.id, f.name)).collect()
        };

        let providers_by_id: HashMap<Uuid, Provider> =
            providers.into_iter().map(|p| (p.id, p)).collect();

        Ok(appointments
            .into_iter()
            .filter_map(|appointment| {
                providers_by_id.get(&appointment.provider_id).map(|provider| {
                    let facility = facility_names.get(&provider.facility_id).cloned();
                    AppointmentView::compose(appointment, provider, facility)
                })
            })
            .collect())
    }

    async fn verify_patient_exists(&self, patient_id: Uuid) -> Result<(), BookingError> {
        let path = format!("/rest/v1/patients?id=eq.{}&select=id", patient_id);
        let result: Vec<Value> = self.store.request(Method::GET, &path, None).await?;

        if result.is_empty() {
            return Err(BookingError::PatientNotFound);
        }
        Ok(())
    }

    async fn bookable_provider(&self, provider_id: Uuid) -> Result<Provider, BookingError> {
        let path = format!("/rest/v1/providers?id=eq.{}", provider_id);
        let result: Vec<Provider> = self.store.request(Method::GET, &path, None).await?;

        match result.into_iter().next() {
            Some(provider) if provider.approval_status == ApprovalStatus::Approved => Ok(provider),
            _ => Err(BookingError::ProviderNotBookable),
        }
    }

    async fn facility_name(&self, facility_id: Uuid) -> Result<Option<String>, BookingError> {
        let path = format!("/rest/v1/facilities?id=eq.{}", facility_id);
        let result: Vec<Facility> = self.store.request(Method::GET, &path, None).await?;

        Ok(result.into_iter().next().map(|f| f.name))
    }
}
