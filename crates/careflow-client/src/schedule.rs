//! Appointment schedule as the front desk sees it.
//!
//! A live load that fails does not leave the view empty: it falls back to
//! the bundled sample appointments and keeps the error message so the
//! caller can show both.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::client::ApiClient;
use crate::schema::{Appointment, AppointmentFilter, AppointmentStatus, Comment, Role};

pub const FALLBACK_MESSAGE: &str = "Failed to load appointments from server. Using mock data.";

/// Only doctors and receptionists book appointments from the schedule.
pub fn can_create_appointment(role: Role) -> bool {
    matches!(role, Role::Doctor | Role::Receptionist)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Live,
    Mock,
}

#[derive(Debug, Clone)]
pub struct ScheduleView {
    pub appointments: Vec<Appointment>,
    /// Where `appointments` actually came from.
    pub source: ScheduleSource,
    /// Set when a live load failed and sample data is shown instead.
    pub error: Option<String>,
}

impl ScheduleView {
    pub async fn load(client: &ApiClient, source: ScheduleSource) -> Self {
        Self::load_filtered(client, source, &AppointmentFilter::default()).await
    }

    /// Like [`ScheduleView::load`], passing `filter` to the server on a live load.
    pub async fn load_filtered(
        client: &ApiClient,
        source: ScheduleSource,
        filter: &AppointmentFilter,
    ) -> Self {
        if source == ScheduleSource::Mock {
            return Self::mock();
        }
        match client.list_appointments(filter).await {
            Ok(appointments) => Self {
                appointments,
                source: ScheduleSource::Live,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "failed to fetch appointments");
                Self {
                    error: Some(FALLBACK_MESSAGE.to_string()),
                    ..Self::mock()
                }
            }
        }
    }

    pub fn mock() -> Self {
        Self {
            appointments: sample_appointments(),
            source: ScheduleSource::Mock,
            error: None,
        }
    }

    /// Appointments matching `status`; `None` means all.
    pub fn filtered(&self, status: Option<AppointmentStatus>) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .collect()
    }

    pub fn count(&self, status: AppointmentStatus) -> usize {
        self.filtered(Some(status)).len()
    }
}

fn day(year: i32, month: u32, d: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn sample(
    id: &str,
    patient: (&str, &str),
    doctor: (&str, &str),
    when: (&str, &str),
    status: AppointmentStatus,
    reason: &str,
) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_id: patient.0.to_string(),
        patient_name: patient.1.to_string(),
        doctor_id: doctor.0.to_string(),
        doctor_name: doctor.1.to_string(),
        date: when.0.to_string(),
        time: when.1.to_string(),
        reason: Some(reason.to_string()),
        status,
        comments: Vec::new(),
    }
}

/// Fixed demo schedule used offline and as the live-load fallback.
pub fn sample_appointments() -> Vec<Appointment> {
    let mut checkup = sample(
        "1",
        ("p1", "John Doe"),
        ("d1", "Smith"),
        ("2024-01-15", "10:00 AM"),
        AppointmentStatus::Scheduled,
        "Annual checkup",
    );
    checkup.comments.push(Comment {
        id: "c1".to_string(),
        user_id: "d1".to_string(),
        user_name: "Dr. Smith".to_string(),
        user_role: Role::Doctor.to_string(),
        content: "Patient has been regular with checkups. Review previous reports before appointment."
            .to_string(),
        timestamp: day(2024, 1, 10),
    });

    vec![
        checkup,
        sample(
            "2",
            ("p2", "Jane Smith"),
            ("d2", "Johnson"),
            ("2024-01-15", "2:00 PM"),
            AppointmentStatus::Scheduled,
            "Follow-up consultation",
        ),
        sample(
            "3",
            ("p3", "Bob Wilson"),
            ("d1", "Smith"),
            ("2024-01-14", "11:30 AM"),
            AppointmentStatus::Completed,
            "Blood pressure check",
        ),
    ]
}
