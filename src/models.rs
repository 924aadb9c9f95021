use serde::{Deserialize, Serialize};

/// A task record as the backend serves it. The id is assigned server-side
/// and never changes; every other field is editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_completed: bool,
    pub owner: String,
}

/// The mutable fields of a task, staged for a create or an edit. Sent as
/// the request body of add-task and task-edit; never carries an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub is_completed: bool,
    pub owner: String,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        TaskDraft {
            name: task.name.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
            owner: task.owner.clone(),
        }
    }
}

/// Target languages offered by the selector. Translation always goes from
/// English, so each language maps to one opus-mt pair model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.iter().copied().find(|l| l.code() == code)
    }

    /// Model identifier for the en -> target pair on the inference host.
    pub fn model_id(self) -> String {
        format!("Helsinki-NLP/opus-mt-en-{}", self.code())
    }

    /// Next language in selector order, wrapping around.
    pub fn next(self) -> Language {
        match self {
            Language::English => Language::Spanish,
            Language::Spanish => Language::French,
            Language::French => Language::German,
            Language::German => Language::English,
        }
    }
}
