//! Create/edit form logic.
//!
//! One form serves both creating and editing: when `editing_id` is set the
//! submit becomes an update of that entry, otherwise a new entry is created.

use shared::{Entry, EntryFormState};
use tracing::info;

use crate::domain::entry_repository::{clean_description, parse_amount, EntryRepository};
use crate::error::{LedgerError, Result, ValidationError, INVALID_DRAFT_NOTICE};
use crate::storage::KeyValueStore;

pub const ADDED_NOTICE: &str = "Entry added";
pub const UPDATED_NOTICE: &str = "Entry updated";

/// Field-by-field validation of the form
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFormValidation {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub cleaned_amount: Option<f64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub entry: Entry,
    pub notice: String,
}

pub struct EntryFormService<S: KeyValueStore> {
    entry_repository: EntryRepository<S>,
}

impl<S: KeyValueStore> Clone for EntryFormService<S> {
    fn clone(&self) -> Self {
        Self {
            entry_repository: self.entry_repository.clone(),
        }
    }
}

impl<S: KeyValueStore> EntryFormService<S> {
    pub fn new(entry_repository: EntryRepository<S>) -> Self {
        Self { entry_repository }
    }

    /// Blank form for a new expense
    pub fn new_form(&self) -> EntryFormState {
        EntryFormState::default()
    }

    /// Form prefilled from a stored entry. A failure here is reported with
    /// [`EntryOperation::LoadEntry`](crate::error::EntryOperation::LoadEntry).
    pub async fn load_for_edit(&self, id: &str) -> Result<EntryFormState> {
        let entry = self
            .entry_repository
            .get_entry(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        Ok(EntryFormState {
            editing_id: Some(entry.id),
            amount_input: entry.amount.to_string(),
            description: entry.description,
            date: entry.date,
            is_income: entry.is_income,
        })
    }

    pub fn validate(&self, state: &EntryFormState) -> EntryFormValidation {
        let mut errors = Vec::new();

        if let Err(e) = clean_description(&state.description) {
            errors.push(e);
        }
        let cleaned_amount = match parse_amount(&state.amount_input) {
            Ok(amount) => Some(amount),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let is_valid = errors.is_empty();
        EntryFormValidation {
            is_valid,
            errors,
            cleaned_amount,
            message: (!is_valid).then(|| INVALID_DRAFT_NOTICE.to_string()),
        }
    }

    /// Save the form as a new entry or as an edit of `editing_id`
    pub async fn submit(&self, state: &EntryFormState) -> Result<FormSubmission> {
        let draft = state.to_draft();

        let submission = match &state.editing_id {
            Some(id) => FormSubmission {
                entry: self.entry_repository.update_entry(id, draft).await?,
                notice: UPDATED_NOTICE.to_string(),
            },
            None => FormSubmission {
                entry: self.entry_repository.create_entry(draft).await?,
                notice: ADDED_NOTICE.to_string(),
            },
        };

        info!("Form submitted: {}", submission.notice);
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EntryOperation, NOT_FOUND_NOTICE};
    use crate::storage::InMemoryStore;
    use std::sync::Arc;

    fn create_test_service() -> (EntryRepository<InMemoryStore>, EntryFormService<InMemoryStore>) {
        let repository = EntryRepository::new(Arc::new(InMemoryStore::new()));
        let service = EntryFormService::new(repository.clone());
        (repository, service)
    }

    fn filled_form(amount: &str, description: &str, is_income: bool) -> EntryFormState {
        EntryFormState {
            amount_input: amount.to_string(),
            description: description.to_string(),
            is_income,
            ..EntryFormState::default()
        }
    }

    #[test]
    fn test_new_form_is_blank_expense() {
        let (_repository, service) = create_test_service();
        let form = service.new_form();
        assert!(!form.is_editing());
        assert!(!form.is_income);
        assert!(form.amount_input.is_empty());
    }

    #[test]
    fn test_validate_reports_every_field() {
        let (_repository, service) = create_test_service();

        let validation = service.validate(&filled_form("abc", " ", false));
        assert!(!validation.is_valid);
        assert_eq!(
            validation.errors,
            vec![
                ValidationError::EmptyDescription,
                ValidationError::InvalidAmount("abc".to_string())
            ]
        );
        assert_eq!(validation.message.as_deref(), Some(INVALID_DRAFT_NOTICE));

        let validation = service.validate(&filled_form(" 19.90 ", "Lunch", false));
        assert!(validation.is_valid);
        assert_eq!(validation.cleaned_amount, Some(19.9));
        assert_eq!(validation.message, None);
    }

    #[tokio::test]
    async fn test_submit_creates_then_updates() {
        let (repository, service) = create_test_service();

        let created = service
            .submit(&filled_form("500", "Salary", true))
            .await
            .unwrap();
        assert_eq!(created.notice, ADDED_NOTICE);

        let mut form = service.load_for_edit(&created.entry.id).await.unwrap();
        assert_eq!(form.editing_id.as_deref(), Some(created.entry.id.as_str()));
        assert_eq!(form.amount_input, "500");
        assert_eq!(form.description, "Salary");
        assert!(form.is_income);

        form.amount_input = "450".to_string();
        let updated = service.submit(&form).await.unwrap();
        assert_eq!(updated.notice, UPDATED_NOTICE);
        assert_eq!(updated.entry.id, created.entry.id);
        assert_eq!(updated.entry.date, created.entry.date);

        assert_eq!(repository.list_entries().await.unwrap().len(), 1);
        assert_eq!(repository.income_accumulator().await.unwrap(), 450.0);
    }

    #[tokio::test]
    async fn test_edit_of_missing_entry() {
        let (_repository, service) = create_test_service();
        let err = service.load_for_edit("gone").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.notice(EntryOperation::LoadEntry), NOT_FOUND_NOTICE);
    }

    #[tokio::test]
    async fn test_edit_keeps_missing_date_absent() {
        let store = InMemoryStore::with_values([(
            "entries",
            r#"[{"id":"old","amount":80.5,"description":"Rent","isIncome":false}]"#,
        )]);
        let repository = EntryRepository::new(Arc::new(store));
        let service = EntryFormService::new(repository.clone());

        let mut form = service.load_for_edit("old").await.unwrap();
        assert_eq!(form.date, None);
        assert_eq!(form.amount_input, "80.5");

        form.description = "Rent (June)".to_string();
        let updated = service.submit(&form).await.unwrap();
        assert_eq!(updated.entry.date, None);
        assert_eq!(repository.get_entry("old").await.unwrap().unwrap().description, "Rent (June)");
    }

    #[tokio::test]
    async fn test_invalid_submit_is_rejected() {
        let (repository, service) = create_test_service();
        let err = service.submit(&filled_form("-5", "bad", false)).await.unwrap_err();
        assert!(err.is_validation());
        assert!(repository.list_entries().await.unwrap().is_empty());
    }
}
