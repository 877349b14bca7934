use crate::model::{
    clamp, default_grades, fallback_label, new_grade_id, AppState, GradeEntry, Settings,
    StudentProfile, AGE_MAX, AGE_MIN, DEFAULT_MAX_SCORE, DEFAULT_PASS_THRESHOLD,
    DEFAULT_STUDENT_AGE, DEFAULT_STUDENT_NAME, DEFAULT_WEIGHT, MAX_SCORE_MAX, MAX_SCORE_MIN,
    WEIGHT_MAX, WEIGHT_MIN,
};
use serde_json::{Map, Value};

/// Numeric coercion for stored records and edits: finite numbers pass
/// through, `null` and blank strings read as 0, booleans as 0/1, other
/// strings are trimmed and parsed. Arrays, objects and non-finite results
/// are non-numeric.
pub fn to_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                0.0
            } else {
                t.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Stricter form for a submitted score: only an actual number or a numeric
/// string counts, so an empty field cannot turn into a 0 entry.
pub fn to_submitted_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(_) => to_number(v),
        Value::String(s) if !s.trim().is_empty() => to_number(v),
        _ => None,
    }
}

pub fn to_number_or(v: Option<&Value>, fallback: f64) -> f64 {
    v.and_then(to_number).unwrap_or(fallback)
}

/// Trimmed text if it has any non-whitespace content.
pub fn non_blank(v: Option<&Value>) -> Option<String> {
    let s = v?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn repair_age(v: Option<&Value>, fallback: i64) -> i64 {
    let n = to_number_or(v, fallback as f64).round();
    clamp(n, AGE_MIN as f64, AGE_MAX as f64) as i64
}

/// Repairs untrusted input into a state that satisfies every field bound.
/// Never fails; anything that is not an object becomes the default state.
pub fn sanitize(raw: &Value) -> AppState {
    let Some(obj) = raw.as_object() else {
        return AppState::fresh_default();
    };

    let settings = sanitize_settings(field_object(obj, "settings"));
    let student = sanitize_student(field_object(obj, "student"));

    let grades = match obj.get("grades") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| sanitize_grade(item.as_object(), idx + 1, &settings))
            .collect(),
        _ => default_grades(),
    };

    AppState {
        student,
        settings,
        grades,
    }
}

fn field_object<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(|v| v.as_object())
}

fn sanitize_settings(raw: Option<&Map<String, Value>>) -> Settings {
    // maxScore is repaired before passThreshold: the threshold range depends on it.
    let max_score = clamp(
        to_number_or(raw.and_then(|o| o.get("maxScore")), DEFAULT_MAX_SCORE),
        MAX_SCORE_MIN,
        MAX_SCORE_MAX,
    );
    let pass_threshold = clamp(
        to_number_or(raw.and_then(|o| o.get("passThreshold")), DEFAULT_PASS_THRESHOLD),
        0.0,
        max_score,
    );
    Settings {
        max_score,
        pass_threshold,
    }
}

fn sanitize_student(raw: Option<&Map<String, Value>>) -> StudentProfile {
    StudentProfile {
        name: non_blank(raw.and_then(|o| o.get("name")))
            .unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string()),
        age: repair_age(raw.and_then(|o| o.get("age")), DEFAULT_STUDENT_AGE),
    }
}

fn sanitize_grade(
    raw: Option<&Map<String, Value>>,
    position: usize,
    settings: &Settings,
) -> GradeEntry {
    let id = raw
        .and_then(|o| o.get("id"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(new_grade_id);
    let label =
        non_blank(raw.and_then(|o| o.get("label"))).unwrap_or_else(|| fallback_label(position));
    let score = clamp(
        to_number_or(raw.and_then(|o| o.get("score")), 0.0),
        0.0,
        settings.max_score,
    );
    let weight = clamp(
        to_number_or(raw.and_then(|o| o.get("weight")), DEFAULT_WEIGHT),
        WEIGHT_MIN,
        WEIGHT_MAX,
    );
    GradeEntry {
        id,
        label,
        score,
        weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(super) fn assert_bounds(state: &AppState) {
        let s = &state.settings;
        assert!((MAX_SCORE_MIN..=MAX_SCORE_MAX).contains(&s.max_score));
        assert!(s.pass_threshold >= 0.0 && s.pass_threshold <= s.max_score);
        assert!((AGE_MIN..=AGE_MAX).contains(&state.student.age));
        assert!(!state.student.name.trim().is_empty());
        for g in &state.grades {
            assert!(g.score >= 0.0 && g.score <= s.max_score, "score {}", g.score);
            assert!((WEIGHT_MIN..=WEIGHT_MAX).contains(&g.weight), "weight {}", g.weight);
            assert!(!g.id.is_empty());
            assert!(!g.label.trim().is_empty());
        }
    }

    #[test]
    fn non_object_input_yields_defaults() {
        for raw in [json!(null), json!(42), json!("x"), json!([1, 2]), json!(true)] {
            let s = sanitize(&raw);
            assert_eq!(s.student, StudentProfile::default());
            assert_eq!(s.settings, Settings::default());
            assert_eq!(s.grades.len(), 3);
        }
    }

    #[test]
    fn threshold_is_clamped_against_repaired_max() {
        let s = sanitize(&json!({
            "settings": { "maxScore": 500, "passThreshold": 250 },
            "grades": []
        }));
        assert_eq!(s.settings.max_score, 100.0);
        assert_eq!(s.settings.pass_threshold, 100.0);

        let s = sanitize(&json!({
            "settings": { "maxScore": 0.2, "passThreshold": 5 },
            "grades": []
        }));
        assert_eq!(s.settings.max_score, 1.0);
        assert_eq!(s.settings.pass_threshold, 1.0);
    }

    #[test]
    fn non_numeric_settings_fall_back_to_defaults() {
        let s = sanitize(&json!({
            "settings": { "maxScore": "abc", "passThreshold": [7] },
            "grades": []
        }));
        assert_eq!(s.settings, Settings::default());
    }

    #[test]
    fn null_bool_and_blank_coerce_like_numbers() {
        let s = sanitize(&json!({
            "student": { "age": null },
            "settings": { "maxScore": null, "passThreshold": true },
            "grades": [
                { "score": true, "weight": null },
                { "score": 3, "weight": "" },
                { "score": false, "weight": "  " }
            ]
        }));
        assert_eq!(s.student.age, 5);
        assert_eq!(s.settings.max_score, 1.0);
        assert_eq!(s.settings.pass_threshold, 1.0);
        assert_eq!(s.grades[0].score, 1.0);
        assert_eq!(s.grades[0].weight, 0.1);
        assert_eq!(s.grades[1].score, 1.0);
        assert_eq!(s.grades[1].weight, 0.1);
        assert_eq!(s.grades[2].score, 0.0);
        assert_eq!(s.grades[2].weight, 0.1);
    }

    #[test]
    fn student_fields_are_repaired_independently() {
        let s = sanitize(&json!({
            "student": { "name": "   ", "age": "17.6" },
            "grades": []
        }));
        assert_eq!(s.student.name, DEFAULT_STUDENT_NAME);
        assert_eq!(s.student.age, 18);

        let s = sanitize(&json!({
            "student": { "name": "  Bruno  ", "age": 300 },
            "grades": []
        }));
        assert_eq!(s.student.name, "Bruno");
        assert_eq!(s.student.age, 120);

        let s = sanitize(&json!({ "student": { "age": "old" }, "grades": [] }));
        assert_eq!(s.student.age, DEFAULT_STUDENT_AGE);

        let s = sanitize(&json!({ "student": { "age": 1 }, "grades": [] }));
        assert_eq!(s.student.age, 5);
    }

    #[test]
    fn empty_grades_differ_from_missing_grades() {
        let empty = sanitize(&json!({ "student": {}, "settings": {}, "grades": [] }));
        assert!(empty.grades.is_empty());

        let missing = sanitize(&json!({ "student": {}, "settings": {} }));
        assert_eq!(missing.grades.len(), 3);
        assert_eq!(missing.grades[0].label, "Exam 1");

        let not_a_list = sanitize(&json!({ "grades": { "0": { "score": 3 } } }));
        assert_eq!(not_a_list.grades.len(), 3);
    }

    #[test]
    fn grade_elements_are_repaired_per_field() {
        let s = sanitize(&json!({
            "settings": { "maxScore": 10, "passThreshold": 6 },
            "grades": [
                { "id": "keep-me", "label": "  Quiz  ", "score": 12, "weight": 0 },
                { "id": "", "label": "", "score": "x", "weight": "heavy" },
                { "score": -4, "weight": 50 },
                null
            ]
        }));
        assert_eq!(s.grades.len(), 4);
        assert_eq!(s.grades[0].id, "keep-me");
        assert_eq!(s.grades[0].label, "Quiz");
        assert_eq!(s.grades[0].score, 10.0);
        assert_eq!(s.grades[0].weight, 0.1);

        assert!(!s.grades[1].id.is_empty());
        assert_ne!(s.grades[1].id, "keep-me");
        assert_eq!(s.grades[1].label, "Assessment 2");
        assert_eq!(s.grades[1].score, 0.0);
        assert_eq!(s.grades[1].weight, 1.0);

        assert_eq!(s.grades[2].label, "Assessment 3");
        assert_eq!(s.grades[2].score, 0.0);
        assert_eq!(s.grades[2].weight, 10.0);

        assert_eq!(s.grades[3].label, "Assessment 4");
        assert_bounds(&s);
    }

    #[test]
    fn lowered_max_score_reclamps_scores() {
        let s = sanitize(&json!({
            "settings": { "maxScore": 5, "passThreshold": 7 },
            "grades": [{ "id": "g1", "label": "Exam", "score": 9, "weight": 1 }]
        }));
        assert_eq!(s.settings.pass_threshold, 5.0);
        assert_eq!(s.grades[0].score, 5.0);
    }

    #[test]
    fn sanitize_is_idempotent_and_round_trips() {
        let inputs = [
            json!(null),
            json!({}),
            json!({ "grades": [] }),
            json!({
                "student": { "name": " Caio ", "age": 15.4 },
                "settings": { "maxScore": 20, "passThreshold": 13.3 },
                "grades": [
                    { "id": "a", "label": "A", "score": 19.99, "weight": 1.7 },
                    { "label": "", "score": "7.25", "weight": 0.05 },
                    { "id": 5, "score": 1e9 }
                ]
            }),
        ];
        for raw in inputs {
            let once = sanitize(&raw);
            assert_bounds(&once);
            let twice = sanitize(&serde_json::to_value(&once).expect("encode"));
            assert_eq!(once, twice);

            let text = serde_json::to_string(&once).expect("serialize");
            let parsed: Value = serde_json::from_str(&text).expect("parse");
            assert_eq!(sanitize(&parsed), once);
        }
    }

    #[test]
    fn to_number_coerces_scalars_and_rejects_non_finite() {
        assert_eq!(to_number(&json!(" 8.5 ")), Some(8.5));
        assert_eq!(to_number(&json!(3)), Some(3.0));
        assert_eq!(to_number(&json!("")), Some(0.0));
        assert_eq!(to_number(&json!("   ")), Some(0.0));
        assert_eq!(to_number(&json!(null)), Some(0.0));
        assert_eq!(to_number(&json!(true)), Some(1.0));
        assert_eq!(to_number(&json!(false)), Some(0.0));
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("abc")), None);
        assert_eq!(to_number(&json!([1])), None);
        assert_eq!(to_number(&json!({})), None);
    }

    #[test]
    fn submitted_number_needs_real_content() {
        assert_eq!(to_submitted_number(&json!(" 6 ")), Some(6.0));
        assert_eq!(to_submitted_number(&json!(6.5)), Some(6.5));
        assert_eq!(to_submitted_number(&json!("")), None);
        assert_eq!(to_submitted_number(&json!(null)), None);
        assert_eq!(to_submitted_number(&json!(true)), None);
        assert_eq!(to_submitted_number(&json!("x")), None);
    }
}

#[cfg(test)]
mod property_tests {
    use super::tests::assert_bounds;
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e4f64..1.0e4).prop_map(Value::from),
            any::<f64>().prop_map(Value::from),
            "[ 0-9a-z.e+\\-]{0,8}".prop_map(Value::from),
        ]
    }

    fn any_json() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("[a-zA-Z]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn grade_like() -> impl Strategy<Value = Value> {
        prop_oneof![
            any_json(),
            (any_json(), any_json(), any_json(), any_json()).prop_map(
                |(id, label, score, weight)| {
                    json!({ "id": id, "label": label, "score": score, "weight": weight })
                }
            ),
        ]
    }

    fn state_like() -> impl Strategy<Value = Value> {
        let settings = prop_oneof![
            any_json(),
            (any_json(), any_json()).prop_map(|(max, thr)| {
                json!({ "maxScore": max, "passThreshold": thr })
            }),
        ];
        let student = prop_oneof![
            any_json(),
            (any_json(), any_json()).prop_map(|(name, age)| json!({ "name": name, "age": age })),
        ];
        let grades = prop_oneof![
            any_json(),
            prop::collection::vec(grade_like(), 0..8).prop_map(Value::Array),
        ];
        (settings, student, grades).prop_map(|(settings, student, grades)| {
            json!({ "settings": settings, "student": student, "grades": grades })
        })
    }

    proptest! {
        #[test]
        fn prop_sanitize_meets_bounds_and_is_idempotent(raw in state_like()) {
            let once = sanitize(&raw);
            assert_bounds(&once);
            let encoded = serde_json::to_value(&once).expect("encode");
            prop_assert_eq!(sanitize(&encoded), once);
        }

        #[test]
        fn prop_any_json_meets_bounds(raw in any_json()) {
            let once = sanitize(&raw);
            assert_bounds(&once);
            let text = serde_json::to_string(&once).expect("serialize");
            let parsed: Value = serde_json::from_str(&text).expect("parse");
            prop_assert_eq!(sanitize(&parsed), once);
        }
    }
}
