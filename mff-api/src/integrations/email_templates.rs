use handlebars::Handlebars;
use serde_json::{json, Value};
use shared_types::{BookingRequest, CompanyProfile, EventRequest, NewContactSubmission};

use super::IntegrationError;

pub const BOOKING_SUBJECT: &str = "Neue Erstgesprächs-Anfrage von musikfürfirmen.de";
pub const CONTACT_SUBJECT: &str = "Neue Kontaktanfrage von musikfürfirmen.de";

const EVENT_REQUEST_TEMPLATE: &str = include_str!("../../templates/event_request.hbs");
const BOOKING_TEMPLATE: &str = include_str!("../../templates/booking.hbs");
const CONTACT_TEMPLATE: &str = include_str!("../../templates/contact.hbs");
const COMPANY_PROFILE_PARTIAL: &str = include_str!("../../templates/company_profile.hbs");

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Internal notification templates, compiled once at startup
pub struct EmailTemplates {
    handlebars: Handlebars<'static>,
}

impl EmailTemplates {
    pub fn new() -> Result<Self, IntegrationError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars
            .register_partial("company_profile", COMPANY_PROFILE_PARTIAL)
            .map_err(|e| IntegrationError::Template(e.to_string()))?;
        for (name, template) in [
            ("event_request", EVENT_REQUEST_TEMPLATE),
            ("booking", BOOKING_TEMPLATE),
            ("contact", CONTACT_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| IntegrationError::Template(e.to_string()))?;
        }

        Ok(Self { handlebars })
    }

    pub fn event_request(
        &self,
        request: &EventRequest,
        research: Option<&CompanyProfile>,
    ) -> Result<RenderedEmail, IntegrationError> {
        let data = json!({
            "name": request.full_name(),
            "company": request.company,
            "email": request.email,
            "phone": request.phone,
            "date": request.date.format("%d.%m.%Y").to_string(),
            "time_window": request.time_window.map(|w| w.label()),
            "city": request.city,
            "guests": request.guests.label(),
            "budget": request.budget,
            "package": request.package.label(),
            "message": request.message,
            "research": research_view(&request.company, research),
        });

        Ok(RenderedEmail {
            subject: format!(
                "Neue Anfrage: {} am {}",
                request.city,
                request.date.format("%Y-%m-%d")
            ),
            html: self.render("event_request", &data)?,
        })
    }

    pub fn booking(
        &self,
        booking: &BookingRequest,
        research: Option<&CompanyProfile>,
    ) -> Result<RenderedEmail, IntegrationError> {
        let data = json!({
            "name": booking.name,
            "company": booking.company,
            "email": booking.email,
            "phone": booking.phone,
            "date": booking.selected_date.format("%d.%m.%Y").to_string(),
            "time": booking.selected_time.format("%H:%M").to_string(),
            "message": booking.message,
            "research": research_view(&booking.company, research),
        });

        Ok(RenderedEmail {
            subject: BOOKING_SUBJECT.to_string(),
            html: self.render("booking", &data)?,
        })
    }

    pub fn contact(
        &self,
        submission: &NewContactSubmission,
        research: Option<&CompanyProfile>,
    ) -> Result<RenderedEmail, IntegrationError> {
        let company = submission.company.as_deref().unwrap_or_default();
        let data = json!({
            "name": submission.name,
            "company": submission.company,
            "email": submission.email,
            "phone": submission.phone,
            "inquiry_type": submission.inquiry_type.label(),
            "message": submission.message,
            "research": research_view(company, research),
        });

        Ok(RenderedEmail {
            subject: CONTACT_SUBJECT.to_string(),
            html: self.render("contact", &data)?,
        })
    }

    fn render(&self, name: &str, data: &Value) -> Result<String, IntegrationError> {
        self.handlebars
            .render(name, data)
            .map_err(|e| IntegrationError::Template(e.to_string()))
    }
}

/// Flattens a profile into what the partial prints
fn research_view(company: &str, research: Option<&CompanyProfile>) -> Value {
    let Some(profile) = research.filter(|p| !p.is_empty()) else {
        return Value::Null;
    };

    let mut headline = Vec::new();
    if let Some(industry) = &profile.industry {
        headline.push(industry.clone());
    }
    if let Some(employees) = &profile.employee_count {
        headline.push(format!("~{} MA", employees));
    }
    if let Some(location) = &profile.location {
        headline.push(location.clone());
    }

    let sources = profile
        .sources
        .iter()
        .map(|url| source_host(url))
        .collect::<Vec<_>>()
        .join(", ");

    json!({
        "company": company,
        "headline": headline.join(" · "),
        "description": profile.description,
        "website": profile.website,
        "website_label": profile.website.as_deref().map(strip_scheme),
        "financials": profile.financials,
        "call_prep": profile.call_prep,
        "talking_points": profile.talking_points,
        "potential_needs": profile.potential_needs,
        "recent_news": profile.recent_news,
        "past_events": profile.past_events,
        "sources": sources,
    })
}

fn strip_scheme(url: &str) -> String {
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.strip_prefix("www.").unwrap_or(url).to_string()
}

fn source_host(url: &str) -> String {
    let stripped = strip_scheme(url);
    stripped
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared_types::{GuestCount, InquiryType, Package, ProfileLink, TimeWindow};

    fn event_request() -> EventRequest {
        EventRequest {
            date: NaiveDate::from_ymd_opt(2027, 6, 4).unwrap(),
            time_window: Some(TimeWindow::Evening),
            city: "Köln".to_string(),
            budget: None,
            guests: GuestCount::From100To300,
            package: Package::BandDj,
            first_name: "Max".to_string(),
            last_name: Some("Mustermann".to_string()),
            company: "Mustermann & Söhne GmbH".to_string(),
            email: "max@example.com".to_string(),
            phone: None,
            message: Some("<b>Sommerfest</b>".to_string()),
            storage_consent: false,
        }
    }

    #[test]
    fn test_event_request_email() {
        let templates = EmailTemplates::new().unwrap();
        let email = templates.event_request(&event_request(), None).unwrap();

        assert_eq!(email.subject, "Neue Anfrage: Köln am 2027-06-04");
        assert!(email.html.contains("04.06.2027"));
        assert!(email.html.contains("Full Band + DJ"));
        assert!(email.html.contains("100 - 300"));
        assert!(email.html.contains("&lt;b&gt;Sommerfest&lt;/b&gt;"));
        assert!(!email.html.contains("FIRMEN-PROFIL"));
    }

    #[test]
    fn test_booking_email_with_profile() {
        let templates = EmailTemplates::new().unwrap();
        let booking = BookingRequest {
            selected_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            selected_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            name: "Max Mustermann".to_string(),
            company: "SAP SE".to_string(),
            email: "max@example.com".to_string(),
            phone: "+49 123 456789".to_string(),
            message: None,
        };
        let profile = CompanyProfile {
            industry: Some("Software".to_string()),
            employee_count: Some("107000".to_string()),
            website: Some("https://www.sap.com".to_string()),
            past_events: vec![ProfileLink {
                title: "SAP Sommerfest".to_string(),
                url: "https://news.sap.com/fest".to_string(),
            }],
            sources: vec!["https://www.sap.com/about".to_string()],
            ..Default::default()
        };

        let email = templates.booking(&booking, Some(&profile)).unwrap();
        assert_eq!(email.subject, BOOKING_SUBJECT);
        assert!(email.html.contains("16.10.2026, 10:00 Uhr"));
        assert!(email.html.contains("FIRMEN-PROFIL: SAP SE"));
        assert!(email.html.contains("Software · ~107000 MA"));
        assert!(email.html.contains("Quellen: sap.com"));
        assert!(email.html.contains("SAP Sommerfest"));
    }

    #[test]
    fn test_contact_email() {
        let templates = EmailTemplates::new().unwrap();
        let submission = NewContactSubmission {
            name: "Erika Musterfrau".to_string(),
            email: "erika@example.com".to_string(),
            phone: None,
            company: None,
            inquiry_type: InquiryType::Booking,
            message: "Habt ihr im Mai Zeit?".to_string(),
        };

        let email = templates.contact(&submission, None).unwrap();
        assert_eq!(email.subject, CONTACT_SUBJECT);
        assert!(email.html.contains("Buchungsanfrage"));
        assert!(!email.html.contains("Firma:"));
    }
}
