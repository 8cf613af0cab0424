use crate::domain::{BoardColor, NewBoard};

#[derive(Debug, Clone, Default)]
pub struct CreateBoardForm {
    pub title: String,
    pub description: String,
    pub color: Option<BoardColor>,
    submitting: bool,
}

impl CreateBoardForm {
    pub fn new(title: &str, description: &str, color: Option<BoardColor>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            color,
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.title.trim().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn to_new_board(&self, user_id: &str) -> NewBoard {
        let description = self.description.trim();

        NewBoard {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            user_id: user_id.to_string(),
            color: self.color.map(|c| c.as_str().to_string()),
        }
    }
}

/// The single-field inline form used to append a list or a card.
#[derive(Debug, Clone, Default)]
pub struct TitleForm {
    pub title: String,
    submitting: bool,
}

impl TitleForm {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.title.trim().is_empty()
    }

    pub fn trimmed(&self) -> String {
        self.title.trim().to_string()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }
}
