//! Plain-text exports — the profile card and the chat transcript.

use std::io;
use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::growth::age_in_months;
use crate::models::ChatMessage;
use crate::models::InfantProfile;

/// Render the profile card text shown in the GUI and written by the
/// profile export. Optional lines are dropped when there is nothing to say.
pub fn render_profile_text(profile: &InfantProfile, today: NaiveDate) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&value);
        out.push('\n');
    };

    line("Name", profile.name.clone());
    line("Sex", profile.sex.as_str().to_string());
    line("Birth date", profile.birth_date.to_string());
    line(
        "Age",
        format!("{} months", age_in_months(profile.birth_date, today)),
    );
    line("Preterm", if profile.is_preterm { "yes" } else { "no" }.to_string());
    if profile.is_preterm {
        if let Some(weeks) = profile.gestational_weeks {
            line("Gestational week", format!("{weeks}"));
        }
    }
    if let Some(w) = profile.weight_kg {
        line("Weight", format!("{w} kg"));
    }
    if let Some(h) = profile.height_cm {
        line("Height", format!("{h} cm"));
    }
    if let Some(hc) = profile.head_circumference_cm {
        line("Head circumference", format!("{hc} cm"));
    }
    if let Some(f) = profile.feeding_type {
        line("Feeding", f.as_str().to_string());
    }
    if let Some(m) = profile.daily_milk_ml {
        line("Daily milk", format!("{m} mL"));
    }
    if let Some(s) = profile.solids_start_month {
        line("Solids started at", format!("{s} months"));
    }
    line("Allergies", text_or_none(&profile.allergies));
    line("Health conditions", text_or_none(&profile.health_conditions));
    line("Supplements", text_or_none(&profile.supplements));
    if let Some(t) = profile.food_texture {
        line("Food texture", t.as_str().to_string());
    }
    line("Disliked foods", text_or_none(&profile.disliked_foods));
    line(
        "Self-feeding",
        if profile.eats_independently { "yes" } else { "not yet" }.to_string(),
    );
    line(
        "Family dietary notes",
        text_or_none(&profile.family_dietary_notes),
    );
    line(
        "City",
        profile
            .city
            .clone()
            .unwrap_or_else(|| "not provided".to_string()),
    );
    line("Record date", profile.record_date.to_string());

    out
}

/// Render the conversation as a role-tagged transcript.
pub fn render_transcript(child_name: &str, messages: &[ChatMessage]) -> String {
    let mut out = format!("Conversation with the advisor about {child_name}\n");
    out.push_str(&format!(
        "Exported {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for message in messages {
        let tag = match message.role {
            crate::models::enums::ChatRole::User => "[You]",
            crate::models::enums::ChatRole::Assistant => "[Advisor]",
        };
        out.push_str(&format!(
            "\n{tag} {}\n{}\n",
            message.timestamp.format("%Y-%m-%d %H:%M:%S"),
            message.content
        ));
    }
    out
}

/// Write exported text to the chosen path.
pub fn save_text(path: &Path, contents: &str) -> io::Result<()> {
    std::fs::write(path, contents)
}

fn text_or_none(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{ChatRole, FeedingType, Sex};
    use chrono::NaiveDateTime;

    fn profile() -> InfantProfile {
        InfantProfile {
            id: 1,
            name: "Bo".into(),
            sex: Sex::Male,
            birth_date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            is_preterm: false,
            gestational_weeks: None,
            weight_kg: Some(8.1),
            height_cm: Some(70.5),
            head_circumference_cm: None,
            feeding_type: Some(FeedingType::Weaned),
            daily_milk_ml: None,
            solids_start_month: Some(5.5),
            allergies: Some("egg".into()),
            health_conditions: None,
            supplements: None,
            food_texture: None,
            disliked_foods: None,
            eats_independently: true,
            family_dietary_notes: None,
            city: None,
            record_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn profile_text_has_labeled_fields_and_age() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let text = render_profile_text(&profile(), today);

        assert!(text.contains("Name: Bo"));
        assert!(text.contains("Age: 11 months"));
        assert!(text.contains("Weight: 8.1 kg"));
        assert!(text.contains("Allergies: egg"));
        assert!(text.contains("Health conditions: none"));
        assert!(text.contains("Self-feeding: yes"));
        assert!(text.contains("City: not provided"));
        // absent measurements are omitted entirely
        assert!(!text.contains("Head circumference"));
        assert!(!text.contains("Daily milk"));
    }

    #[test]
    fn preterm_line_includes_weeks() {
        let mut p = profile();
        p.is_preterm = true;
        p.gestational_weeks = Some(33);
        let text = render_profile_text(&p, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        assert!(text.contains("Preterm: yes"));
        assert!(text.contains("Gestational week: 33"));
    }

    #[test]
    fn transcript_tags_roles_in_order() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let messages = vec![
            ChatMessage {
                id: 1,
                child_name: "Bo".into(),
                role: ChatRole::User,
                content: "Can he have eggs?".into(),
                timestamp: ts,
            },
            ChatMessage {
                id: 2,
                child_name: "Bo".into(),
                role: ChatRole::Assistant,
                content: "He is allergic to egg, so no.".into(),
                timestamp: ts,
            },
        ];

        let text = render_transcript("Bo", &messages);
        assert!(text.contains("Conversation with the advisor about Bo"));
        let you = text.find("[You] 2026-01-05 09:00:00").unwrap();
        let advisor = text.find("[Advisor]").unwrap();
        assert!(you < advisor);
        assert!(text.contains("allergic to egg"));
    }

    #[test]
    fn save_text_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.txt");
        save_text(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
