//! Contact book controller.
//!
//! # Responsibility
//! - Own the authoritative in-memory collection, page selection and form
//!   mode as one explicit state object.
//! - Orchestrate create/update/delete: validate, mutate, persist, re-page,
//!   render.
//! - Talk to the presentation layer only through `RenderSink` and
//!   `ConfirmPrompt`.
//!
//! # Invariants
//! - Every state change ends with exactly one `render` call.
//! - The in-memory collection is mutated before persistence and is never
//!   rolled back when a save fails.
//! - Validation failures and unknown ids never mutate the collection.

use crate::clock::Clock;
use crate::model::contact::{Contact, ContactId};
use crate::model::validation::{validate_field, ContactField, ValidationError, ValidationMode};
use crate::pagination::{PageState, PageView};
use crate::repo::contact_store::ContactStore;
use crate::storage::KeyValueStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_CREATED: &str = "Contact added.";
const MSG_UPDATED: &str = "Contact updated.";
const MSG_DELETED: &str = "Contact deleted.";
const MSG_NOT_FOUND: &str = "Contact not found. It may have been deleted.";
const MSG_FIX_ERRORS: &str = "Please fix the highlighted fields.";

/// Receives the current state after every change.
pub trait RenderSink {
    fn render(&mut self, frame: &RenderFrame);
}

/// Asks the user to confirm a destructive action.
pub trait ConfirmPrompt {
    /// Returns `true` when `contact` may be deleted.
    fn confirm_delete(&mut self, contact: &Contact) -> bool;
}

/// Whether the form creates a new contact or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ContactId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Error,
}

/// Form-level message shown alongside the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Everything the presentation layer needs to draw one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub view: PageView,
    pub form_mode: FormMode,
    /// Field-level validation errors from the last submit.
    pub field_errors: Vec<ValidationError>,
    pub messages: Vec<StatusMessage>,
    /// The form inputs should be cleared and focus returned to the first
    /// field.
    pub reset_form: bool,
}

impl RenderFrame {
    /// Field errors keyed by `field`, in rule order.
    pub fn errors_for(&self, field: ContactField) -> Vec<ValidationError> {
        self.field_errors
            .iter()
            .copied()
            .filter(|error| error.field() == field)
            .collect()
    }
}

/// Operation failure surfaced to the caller. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactBookError {
    /// Form input violated one or more rules.
    Validation(Vec<ValidationError>),
    /// The referenced contact is no longer in the collection.
    NotFound(ContactId),
}

impl Display for ContactBookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => {
                let messages = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "invalid contact: {messages}")
            }
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
        }
    }
}

impl Error for ContactBookError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(ContactId),
    Updated(ContactId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The confirmation prompt was declined; nothing changed.
    Declined,
}

/// Application state object and controller.
pub struct ContactBook<S, C, V, P>
where
    S: KeyValueStore,
    C: Clock,
    V: RenderSink,
    P: ConfirmPrompt,
{
    contacts: Vec<Contact>,
    page: PageState,
    form_mode: FormMode,
    store: ContactStore<S>,
    clock: C,
    sink: V,
    prompt: P,
}

impl<S, C, V, P> ContactBook<S, C, V, P>
where
    S: KeyValueStore,
    C: Clock,
    V: RenderSink,
    P: ConfirmPrompt,
{
    /// Loads the persisted collection and renders the first page.
    pub fn open(store: ContactStore<S>, clock: C, sink: V, prompt: P) -> Self {
        let contacts = store.load(&clock);
        info!(
            "event=contact_book_open module=service status=ok medium={} count={}",
            store.medium(),
            contacts.len()
        );

        let mut book = Self {
            contacts,
            page: PageState::default(),
            form_mode: FormMode::Create,
            store,
            clock,
            sink,
            prompt,
        };
        book.render(Vec::new(), Vec::new(), false);
        book
    }

    /// Submits the form: creates in `FormMode::Create`, updates the edited
    /// contact in `FormMode::Edit`.
    pub fn submit(&mut self, name: &str, email: &str) -> Result<SubmitOutcome, ContactBookError> {
        match self.form_mode.clone() {
            FormMode::Create => self.create(name, email),
            FormMode::Edit(id) => self.update(&id, name, email),
        }
    }

    /// Creates a contact and jumps to the last page.
    pub fn create(&mut self, name: &str, email: &str) -> Result<SubmitOutcome, ContactBookError> {
        let contact = match Contact::create(name, email, self.clock.now()) {
            Ok(contact) => contact,
            Err(errors) => return Err(self.reject(errors)),
        };

        let id = contact.id().to_string();
        self.contacts.push(contact);
        let mut messages = vec![StatusMessage::new(StatusKind::Success, MSG_CREATED)];
        messages.extend(self.persist());
        self.page.after_create(self.contacts.len());
        self.form_mode = FormMode::Create;

        info!(
            "event=contact_create module=service status=ok id={id} count={}",
            self.contacts.len()
        );
        self.render(Vec::new(), messages, true);
        Ok(SubmitOutcome::Created(id))
    }

    /// Replaces name/email of contact `id`, keeping the current page.
    pub fn update(
        &mut self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<SubmitOutcome, ContactBookError> {
        let Some(index) = self.position(id) else {
            self.form_mode = FormMode::Create;
            return Err(self.not_found(id, true));
        };

        let now = self.clock.now();
        if let Err(errors) = self.contacts[index].update(name, email, now) {
            return Err(self.reject(errors));
        }

        let mut messages = vec![StatusMessage::new(StatusKind::Success, MSG_UPDATED)];
        messages.extend(self.persist());
        self.page.after_update();
        self.form_mode = FormMode::Create;

        info!("event=contact_update module=service status=ok id={id}");
        self.render(Vec::new(), messages, true);
        Ok(SubmitOutcome::Updated(id.to_string()))
    }

    /// Switches the form to edit `id`.
    pub fn begin_edit(&mut self, id: &str) -> Result<(), ContactBookError> {
        if self.position(id).is_none() {
            return Err(self.not_found(id, false));
        }
        self.form_mode = FormMode::Edit(id.to_string());
        self.render(Vec::new(), Vec::new(), false);
        Ok(())
    }

    /// Leaves edit mode and clears the form.
    pub fn cancel_edit(&mut self) {
        self.form_mode = FormMode::Create;
        self.render(Vec::new(), Vec::new(), true);
    }

    /// Deletes `id` after confirmation.
    ///
    /// Clamps the page when the last page disappears, and resets the form
    /// when the deleted contact was being edited.
    pub fn delete(&mut self, id: &str) -> Result<DeleteOutcome, ContactBookError> {
        let Some(index) = self.position(id) else {
            return Err(self.not_found(id, false));
        };

        if !self.prompt.confirm_delete(&self.contacts[index]) {
            debug!("event=contact_delete module=service status=declined id={id}");
            self.render(Vec::new(), Vec::new(), false);
            return Ok(DeleteOutcome::Declined);
        }

        self.contacts.remove(index);
        let mut messages = vec![StatusMessage::new(StatusKind::Success, MSG_DELETED)];
        messages.extend(self.persist());
        self.page.after_delete(self.contacts.len());

        let was_editing = self.form_mode == FormMode::Edit(id.to_string());
        if was_editing {
            self.form_mode = FormMode::Create;
        }

        info!(
            "event=contact_delete module=service status=ok id={id} count={}",
            self.contacts.len()
        );
        self.render(Vec::new(), messages, was_editing);
        Ok(DeleteOutcome::Deleted)
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page.go_to(page, self.contacts.len());
        self.render(Vec::new(), Vec::new(), false);
    }

    pub fn next_page(&mut self) {
        self.page.next(self.contacts.len());
        self.render(Vec::new(), Vec::new(), false);
    }

    pub fn previous_page(&mut self) {
        self.page.previous(self.contacts.len());
        self.render(Vec::new(), Vec::new(), false);
    }

    /// Live feedback for one form field; does not touch state or render.
    pub fn check_field(
        &self,
        field: ContactField,
        value: &str,
        mode: ValidationMode,
    ) -> Vec<ValidationError> {
        validate_field(field, value, mode)
    }

    /// Authoritative collection, in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id() == id)
    }

    pub fn current_page(&self) -> usize {
        self.page.current()
    }

    pub fn form_mode(&self) -> &FormMode {
        &self.form_mode
    }

    /// View of the current page.
    pub fn view(&self) -> PageView {
        self.page.view(&self.contacts)
    }

    pub fn store(&self) -> &ContactStore<S> {
        &self.store
    }

    pub fn sink(&self) -> &V {
        &self.sink
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id() == id)
    }

    fn persist(&mut self) -> Option<StatusMessage> {
        match self.store.save(&self.contacts) {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    "event=contact_persist module=service status=error count={} error={err}",
                    self.contacts.len()
                );
                Some(StatusMessage::new(StatusKind::Warning, err.user_message()))
            }
        }
    }

    fn reject(&mut self, errors: Vec<ValidationError>) -> ContactBookError {
        debug!(
            "event=contact_validate module=service status=rejected error_count={}",
            errors.len()
        );
        let messages = vec![StatusMessage::new(StatusKind::Error, MSG_FIX_ERRORS)];
        self.render(errors.clone(), messages, false);
        ContactBookError::Validation(errors)
    }

    fn not_found(&mut self, id: &str, reset_form: bool) -> ContactBookError {
        warn!("event=contact_lookup module=service status=not_found id={id}");
        let messages = vec![StatusMessage::new(StatusKind::Error, MSG_NOT_FOUND)];
        self.render(Vec::new(), messages, reset_form);
        ContactBookError::NotFound(id.to_string())
    }

    fn render(
        &mut self,
        field_errors: Vec<ValidationError>,
        messages: Vec<StatusMessage>,
        reset_form: bool,
    ) {
        let frame = RenderFrame {
            view: self.page.view(&self.contacts),
            form_mode: self.form_mode.clone(),
            field_errors,
            messages,
            reset_form,
        };
        self.sink.render(&frame);
    }
}
