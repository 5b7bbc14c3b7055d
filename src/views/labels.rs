//! Shared label tables: department names, status wording and colours.

/// Upper-case the first character, leave the rest alone.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display name for a department key. Unknown keys are capitalized as-is.
pub fn department_name(key: &str) -> String {
    let name = match key.to_lowercase().as_str() {
        "general" => "General Medicine",
        "cardiology" => "Cardiology",
        "orthopedics" => "Orthopedics",
        "pediatrics" => "Pediatrics",
        "gynecology" => "Gynecology",
        "surgery" => "Surgery",
        "ent" => "ENT",
        "dermatology" => "Dermatology",
        "ophthalmology" => "Ophthalmology",
        "psychiatry" => "Psychiatry",
        _ => return capitalize(key),
    };
    name.to_string()
}

/// Title-case wording for queue and schedule statuses.
pub fn format_status(status: &str) -> String {
    let label = match status {
        "scheduled" => "Scheduled",
        "in_progress" | "in-progress" => "In Progress",
        "ongoing" => "Ongoing",
        "completed" => "Completed",
        "cancelled" => "Cancelled",
        "waiting" => "Waiting",
        "called" => "Called",
        _ => return capitalize(status),
    };
    label.to_string()
}

/// Badge colour for an OT or consultation status.
pub fn schedule_status_color(status: &str) -> &'static str {
    match status {
        "scheduled" => "primary",
        "in_progress" | "ongoing" => "warning",
        "completed" => "success",
        "cancelled" => "danger",
        _ => "secondary",
    }
}
