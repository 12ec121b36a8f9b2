use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Event request wizard
    types.push(clean_type(TimeWindow::export_to_string()?));
    types.push(clean_type(GuestCount::export_to_string()?));
    types.push(clean_type(Package::export_to_string()?));
    types.push(clean_type(EventRequestPayload::export_to_string()?));
    types.push(clean_type(EventRequest::export_to_string()?));
    types.push(clean_type(EventRequestAcceptedResponse::export_to_string()?));

    // Booking calendar
    types.push(clean_type(BookingStatus::export_to_string()?));
    types.push(clean_type(BookingRequestPayload::export_to_string()?));
    types.push(clean_type(BookingRequest::export_to_string()?));
    types.push(clean_type(CalendarBooking::export_to_string()?));
    types.push(clean_type(BookingCreatedResponse::export_to_string()?));
    types.push(clean_type(CalendarDay::export_to_string()?));
    types.push(clean_type(CalendarMonthResponse::export_to_string()?));
    types.push(clean_type(TimeSlotsResponse::export_to_string()?));

    // Contact form
    types.push(clean_type(InquiryType::export_to_string()?));
    types.push(clean_type(SubmissionStatus::export_to_string()?));
    types.push(clean_type(ContactSubmissionPayload::export_to_string()?));
    types.push(clean_type(NewContactSubmission::export_to_string()?));
    types.push(clean_type(ContactSubmission::export_to_string()?));
    types.push(clean_type(ContactSubmissionCreatedResponse::export_to_string()?));

    // Company research
    types.push(clean_type(ProfileLink::export_to_string()?));
    types.push(clean_type(CompanyProfile::export_to_string()?));

    // Misc
    types.push(clean_type(ErrorResponse::export_to_string()?));
    types.push(clean_type(ValidationErrorResponse::export_to_string()?));
    types.push(clean_type(CitySuggestion::export_to_string()?));
    types.push(clean_type(CitySuggestionsResponse::export_to_string()?));
    types.push(clean_type(IntegrationStatus::export_to_string()?));
    types.push(clean_type(SettingsResponse::export_to_string()?));

    let output = format!(
        "// This file was generated by shared-types/src/bin/generate_api_types.rs\n// Do not edit by hand\n\n{}\n",
        types.join("\n\n")
    );

    let out_dir = Path::new("bindings");
    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join("api.ts"), output)?;

    println!("Generated {} TypeScript definitions in bindings/api.ts", types.len());
    Ok(())
}

fn clean_type(type_def: String) -> String {
    type_def
        .lines()
        .filter(|line| !line.starts_with("import type"))
        .filter(|line| !line.starts_with("// This file was generated"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
