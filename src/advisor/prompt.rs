use crate::models::InfantProfile;

/// System prompt used when no profile is selected yet.
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a professional infant and toddler \
nutrition advisor, focused on science-based feeding guidance and health advice for \
children aged 0-3 years.";

/// Render the advisor system prompt by interpolating the child's profile
/// into the fixed template. Falls back to the generic prompt without one.
pub fn build_system_prompt(profile: Option<&InfantProfile>) -> String {
    let Some(p) = profile else {
        return FALLBACK_SYSTEM_PROMPT.to_string();
    };

    let preterm = if p.is_preterm { "yes" } else { "no" };
    let gestational = p
        .gestational_weeks
        .map(|w| format!("{w} weeks"))
        .unwrap_or_else(|| "not applicable".to_string());
    let eats_independently = if p.eats_independently {
        "can eat independently"
    } else {
        "cannot eat independently yet"
    };

    format!(
        "{FALLBACK_SYSTEM_PROMPT}\n\n\
Based on the following details, give this child a personalized constitution \
assessment, nutrition analysis, and recipe recommendations.\n\n\
[Basic information]\n\
Name: {name}\n\
Sex: {sex}\n\
Birth date: {birth_date}\n\
Preterm: {preterm}\n\
Gestational week: {gestational}\n\n\
[Latest examination]\n\
Weight: {weight} kg\n\
Height/length: {height} cm\n\n\
[Feeding]\n\
Main feeding type: {feeding}\n\
Daily milk intake: {milk} mL\n\
Solid foods started at: {solids} months\n\n\
[Health and allergies]\n\
Food allergies: {allergies}\n\
Health conditions: {conditions}\n\
Current supplements: {supplements}\n\n\
[Eating habits]\n\
Accepted food texture: {texture}\n\
Disliked foods: {disliked}\n\
Self-feeding: {eats_independently}\n\n\
[Family]\n\
Family dietary restrictions: {family}\n\
City: {city}\n\n\
Cover the following in your answer:\n\
1. Constitution assessment: what the measurements and history suggest about the child's condition\n\
2. Nutrition analysis: whether current intake meets the child's needs\n\
3. Recipe recommendations: meals suited to the child's age, habits, and health\n\
4. Health advice: concrete suggestions for the child's specific situation\n\n\
Keep in mind:\n\
- Ground every suggestion in infant nutrition guidelines\n\
- Never recommend a food the child is allergic to\n\
- Keep advice concrete and practical for parents to act on\n\
- Use plain language and avoid clinical jargon",
        name = p.name,
        sex = p.sex.as_str(),
        birth_date = p.birth_date,
        weight = opt_num(p.weight_kg),
        height = opt_num(p.height_cm),
        feeding = p
            .feeding_type
            .map(|f| f.as_str())
            .unwrap_or("unknown"),
        milk = opt_num(p.daily_milk_ml),
        solids = opt_num(p.solids_start_month),
        allergies = opt_text(&p.allergies),
        conditions = opt_text(&p.health_conditions),
        supplements = opt_text(&p.supplements),
        texture = p.food_texture.map(|t| t.as_str()).unwrap_or("unknown"),
        disliked = opt_text(&p.disliked_foods),
        family = opt_text(&p.family_dietary_notes),
        city = opt_text(&p.city),
    )
}

fn opt_text(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(s) if !s.trim().is_empty() => s,
        _ => "none",
    }
}

fn opt_num(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v}"))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{FeedingType, FoodTexture, Sex};
    use chrono::{NaiveDate, NaiveDateTime};

    fn profile() -> InfantProfile {
        InfantProfile {
            id: 1,
            name: "Mei".into(),
            sex: Sex::Female,
            birth_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            is_preterm: true,
            gestational_weeks: Some(34),
            weight_kg: Some(7.2),
            height_cm: Some(66.0),
            head_circumference_cm: Some(43.0),
            feeding_type: Some(FeedingType::Mixed),
            daily_milk_ml: Some(600.0),
            solids_start_month: Some(6.0),
            allergies: Some("egg, peanut".into()),
            health_conditions: None,
            supplements: Some("vitamin D".into()),
            food_texture: Some(FoodTexture::Puree),
            disliked_foods: Some("carrot".into()),
            eats_independently: false,
            family_dietary_notes: None,
            city: Some("Hangzhou".into()),
            record_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn no_profile_uses_fallback() {
        assert_eq!(build_system_prompt(None), FALLBACK_SYSTEM_PROMPT);
    }

    #[test]
    fn prompt_interpolates_profile_fields() {
        let prompt = build_system_prompt(Some(&profile()));
        assert!(prompt.contains("Name: Mei"));
        assert!(prompt.contains("Sex: female"));
        assert!(prompt.contains("Birth date: 2025-03-14"));
        assert!(prompt.contains("Preterm: yes"));
        assert!(prompt.contains("Gestational week: 34 weeks"));
        assert!(prompt.contains("Weight: 7.2 kg"));
        assert!(prompt.contains("Daily milk intake: 600 mL"));
        assert!(prompt.contains("Food allergies: egg, peanut"));
        assert!(prompt.contains("City: Hangzhou"));
    }

    #[test]
    fn absent_fields_render_placeholders() {
        let mut p = profile();
        p.is_preterm = false;
        p.gestational_weeks = None;
        p.weight_kg = None;
        p.allergies = Some("   ".into());
        p.city = None;

        let prompt = build_system_prompt(Some(&p));
        assert!(prompt.contains("Preterm: no"));
        assert!(prompt.contains("Gestational week: not applicable"));
        assert!(prompt.contains("Weight: unknown kg"));
        assert!(prompt.contains("Food allergies: none"));
        assert!(prompt.contains("City: none"));
    }

    #[test]
    fn prompt_demands_allergy_caution_and_sections() {
        let prompt = build_system_prompt(Some(&profile()));
        assert!(prompt.contains("Never recommend a food the child is allergic to"));
        assert!(prompt.contains("1. Constitution assessment"));
        assert!(prompt.contains("3. Recipe recommendations"));
    }
}
