//! Turns a submitted booking form into a ready-to-send messaging link.

use metrics::counter;
use time::Date;
use tracing::{info, warn};

use crate::{
    domain::booking::{BookingErrors, BookingSubmission, MessagingLink},
    infra::telemetry::{BOOKING_REJECTIONS_TOTAL, BOOKING_SUBMISSIONS_TOTAL},
};

/// Everything the visitor needs to hand the booking to the messaging app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    pub message: String,
    pub app_link: String,
    pub web_link: String,
}

#[derive(Debug, Clone)]
pub struct BookingService {
    link: MessagingLink,
    organization: String,
}

impl BookingService {
    pub fn new(link: MessagingLink, organization: impl Into<String>) -> Self {
        Self {
            link,
            organization: organization.into(),
        }
    }

    pub fn link(&self) -> &MessagingLink {
        &self.link
    }

    /// Validate a submission and build its links. No link is produced unless
    /// every field passes.
    pub fn submit(
        &self,
        submission: &BookingSubmission,
        today: Date,
    ) -> Result<BookingOutcome, BookingErrors> {
        let request = match submission.validate(today) {
            Ok(request) => request,
            Err(errors) => {
                let fields = errors
                    .iter()
                    .map(|error| error.field.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                warn!(
                    target = "gambit::booking",
                    fields = %fields,
                    "booking rejected"
                );
                counter!(BOOKING_REJECTIONS_TOTAL).increment(1);
                return Err(errors);
            }
        };

        let message = request.message(&self.organization);
        let outcome = BookingOutcome {
            app_link: self.link.app_link(&message),
            web_link: self.link.web_link(&message),
            message,
        };

        info!(
            target = "gambit::booking",
            device = %request.device,
            language = %request.language,
            "booking link issued"
        );
        counter!(BOOKING_SUBMISSIONS_TOTAL).increment(1);
        Ok(outcome)
    }
}
