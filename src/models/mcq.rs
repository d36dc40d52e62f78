use serde::{Deserialize, Serialize};

use super::patch::Patch;

/// A stored multiple-choice question.
///
/// The correct answer travels as `correctanswer` on the wire and in the
/// `mcqs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub id: i32,
    pub subject: String,
    pub chapter: String,
    pub question: String,
    #[serde(rename = "correctanswer")]
    pub correct_answer: String,
    pub option1: String,
    pub option2: String,
    pub option3: Option<String>,
    pub option4: Option<String>,
}

/// Body of `POST /mcqs/`. Any `id` supplied by the caller is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMcqRequest {
    pub subject: String,
    pub chapter: String,
    pub question: String,
    #[serde(rename = "correctanswer")]
    pub correct_answer: String,
    pub option1: String,
    pub option2: String,
    #[serde(default)]
    pub option3: Option<String>,
    #[serde(default)]
    pub option4: Option<String>,
}

/// Body of `PATCH /mcqs/{mcq_id}`: only keys present in the JSON are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMcqRequest {
    #[serde(default)]
    pub subject: Patch<String>,
    #[serde(default)]
    pub chapter: Patch<String>,
    #[serde(default)]
    pub question: Patch<String>,
    #[serde(default, rename = "correctanswer")]
    pub correct_answer: Patch<String>,
    #[serde(default)]
    pub option1: Patch<String>,
    #[serde(default)]
    pub option2: Patch<String>,
    #[serde(default)]
    pub option3: Patch<Option<String>>,
    #[serde(default)]
    pub option4: Patch<Option<String>>,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}

impl Mcq {
    /// Overlays the supplied fields onto this record, in column order.
    pub fn apply_patch(&mut self, patch: UpdateMcqRequest) {
        patch.subject.apply_to(&mut self.subject);
        patch.chapter.apply_to(&mut self.chapter);
        patch.question.apply_to(&mut self.question);
        patch.correct_answer.apply_to(&mut self.correct_answer);
        patch.option1.apply_to(&mut self.option1);
        patch.option2.apply_to(&mut self.option2);
        patch.option3.apply_to(&mut self.option3);
        patch.option4.apply_to(&mut self.option4);
    }
}

impl CreateMcqRequest {
    /// Required text fields must not be empty. Values are stored as sent.
    pub fn validate(&self) -> Result<(), String> {
        require_non_empty("subject", &self.subject)?;
        require_non_empty("chapter", &self.chapter)?;
        require_non_empty("question", &self.question)?;
        require_non_empty("correctanswer", &self.correct_answer)?;
        require_non_empty("option1", &self.option1)?;
        require_non_empty("option2", &self.option2)?;
        Ok(())
    }
}

impl UpdateMcqRequest {
    /// Same rules as creation, applied to whichever required fields are present.
    /// An empty patch is valid.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("subject", &self.subject),
            ("chapter", &self.chapter),
            ("question", &self.question),
            ("correctanswer", &self.correct_answer),
            ("option1", &self.option1),
            ("option2", &self.option2),
        ];

        for (field, patch) in required {
            if let Some(value) = patch.as_present() {
                require_non_empty(field, value)?;
            }
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_absent()
            && self.chapter.is_absent()
            && self.question.is_absent()
            && self.correct_answer.is_absent()
            && self.option1.is_absent()
            && self.option2.is_absent()
            && self.option3.is_absent()
            && self.option4.is_absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mcq() -> Mcq {
        Mcq {
            id: 7,
            subject: "physics".to_string(),
            chapter: "optics".to_string(),
            question: "What bends light?".to_string(),
            correct_answer: "A".to_string(),
            option1: "A lens".to_string(),
            option2: "A mirror".to_string(),
            option3: Some("A prism".to_string()),
            option4: None,
        }
    }

    fn sample_create_request() -> CreateMcqRequest {
        CreateMcqRequest {
            subject: "physics".to_string(),
            chapter: "optics".to_string(),
            question: "What bends light?".to_string(),
            correct_answer: "A".to_string(),
            option1: "A lens".to_string(),
            option2: "A mirror".to_string(),
            option3: None,
            option4: None,
        }
    }

    #[test]
    fn test_mcq_serialization_uses_wire_names() {
        let json = serde_json::to_string(&sample_mcq()).expect("Failed to serialize mcq");
        let expected = r#"{"id":7,"subject":"physics","chapter":"optics","question":"What bends light?","correctanswer":"A","option1":"A lens","option2":"A mirror","option3":"A prism","option4":null}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_create_request_deserialization() {
        let json = r#"{"subject":"physics","chapter":"optics","question":"Q?","correctanswer":"B","option1":"a","option2":"b","option3":""}"#;
        let request: CreateMcqRequest = serde_json::from_str(json).expect("Failed to deserialize CreateMcqRequest");

        assert_eq!(request.correct_answer, "B");
        assert_eq!(request.option3, Some(String::new()));
        assert_eq!(request.option4, None);
    }

    #[test]
    fn test_create_request_ignores_caller_id() {
        let json = r#"{"id":99,"subject":"s","chapter":"c","question":"q","correctanswer":"a","option1":"1","option2":"2"}"#;
        assert!(serde_json::from_str::<CreateMcqRequest>(json).is_ok());
    }

    #[test]
    fn test_create_request_missing_required_field() {
        let json = r#"{"subject":"s","chapter":"c","question":"q","option1":"1","option2":"2"}"#;
        assert!(serde_json::from_str::<CreateMcqRequest>(json).is_err());
    }

    #[test]
    fn test_create_request_validation() {
        assert!(sample_create_request().validate().is_ok());

        let mut empty_subject = sample_create_request();
        empty_subject.subject = String::new();
        assert_eq!(empty_subject.validate(), Err("subject cannot be empty".to_string()));

        // Whitespace is a value like any other
        let mut whitespace_subject = sample_create_request();
        whitespace_subject.subject = "   ".to_string();
        assert!(whitespace_subject.validate().is_ok());

        let mut empty_answer = sample_create_request();
        empty_answer.correct_answer = String::new();
        assert_eq!(empty_answer.validate(), Err("correctanswer cannot be empty".to_string()));

        let mut empty_option2 = sample_create_request();
        empty_option2.option2 = String::new();
        assert!(empty_option2.validate().is_err());

        // option3 / option4 may be empty
        let mut empty_optionals = sample_create_request();
        empty_optionals.option3 = Some(String::new());
        empty_optionals.option4 = Some(String::new());
        assert!(empty_optionals.validate().is_ok());
    }

    #[test]
    fn test_patch_only_correct_answer() {
        let original = sample_mcq();
        let patch: UpdateMcqRequest = serde_json::from_str(r#"{"correctanswer":"B"}"#).unwrap();

        let mut merged = original.clone();
        merged.apply_patch(patch);

        assert_eq!(merged.correct_answer, "B");
        assert_eq!(
            Mcq { correct_answer: original.correct_answer.clone(), ..merged },
            original
        );
    }

    #[test]
    fn test_patch_clears_optional_with_null() {
        let mut mcq = sample_mcq();
        let patch: UpdateMcqRequest = serde_json::from_str(r#"{"option3":null,"option4":"A laser"}"#).unwrap();

        mcq.apply_patch(patch);

        assert_eq!(mcq.option3, None);
        assert_eq!(mcq.option4, Some("A laser".to_string()));
        assert_eq!(mcq.subject, "physics");
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let patch: UpdateMcqRequest = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        assert!(patch.validate().is_ok());

        let mut mcq = sample_mcq();
        mcq.apply_patch(patch);
        assert_eq!(mcq, sample_mcq());
    }

    #[test]
    fn test_patch_ignores_id() {
        let patch: UpdateMcqRequest = serde_json::from_str(r#"{"id":1,"chapter":"waves"}"#).unwrap();

        let mut mcq = sample_mcq();
        mcq.apply_patch(patch);

        assert_eq!(mcq.id, 7);
        assert_eq!(mcq.chapter, "waves");
    }

    #[test]
    fn test_patch_validation() {
        let empty: UpdateMcqRequest = serde_json::from_str(r#"{"question":""}"#).unwrap();
        assert_eq!(empty.validate(), Err("question cannot be empty".to_string()));

        let whitespace: UpdateMcqRequest = serde_json::from_str(r#"{"question":"  "}"#).unwrap();
        assert!(whitespace.validate().is_ok());

        let empty_optional: UpdateMcqRequest = serde_json::from_str(r#"{"option4":""}"#).unwrap();
        assert!(empty_optional.validate().is_ok());

        assert!(serde_json::from_str::<UpdateMcqRequest>(r#"{"option1":null}"#).is_err());
    }
}
