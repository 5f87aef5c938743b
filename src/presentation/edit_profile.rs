use log::info;

use crate::app::App;
use crate::models::user::User;
use crate::presentation::ProfileForm;
use crate::use_cases::UpdateUser;
use crate::validation::InputKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditProfileState {
    pub user: Option<User>,
    pub form: ProfileForm,
    pub is_loading: bool,
    pub form_has_errors: bool,
    pub update_success: bool,
    pub api_error: Option<String>,
}

impl Default for EditProfileState {
    fn default() -> Self {
        EditProfileState {
            user: None,
            form: ProfileForm::default(),
            is_loading: true,
            form_has_errors: false,
            update_success: false,
            api_error: None,
        }
    }
}

pub struct EditProfileHolder<'a> {
    app: &'a App,
    pub state: EditProfileState,
}

impl<'a> EditProfileHolder<'a> {
    /// Loads the current profile and pre-fills the form with it.
    pub fn new(app: &'a App) -> Self {
        let mut holder = EditProfileHolder {
            app,
            state: EditProfileState::default(),
        };
        match app.get_user().execute() {
            Ok(user) => {
                holder.state.form = ProfileForm::from_user(&user);
                holder.state.user = Some(user);
            }
            Err(e) => holder.state.api_error = Some(e.to_string()),
        }
        holder.state.is_loading = false;
        holder
    }

    pub fn update(&mut self, input: &str, key: InputKey) {
        self.state.form.set(key, input);
    }

    pub fn validate(&mut self, key: InputKey) {
        self.state.form.validate(key, &self.app.validator);
    }

    /// Validate every field and, when clean, push the update. Returns whether
    /// the update went through.
    pub fn on_confirm(&mut self) -> bool {
        self.state.form.validate_all(&self.app.validator);
        self.state.form_has_errors = self.state.form.has_errors();
        if self.state.form_has_errors {
            return false;
        }

        let (id, roles) = match &self.state.user {
            Some(user) => (user.id.clone(), user.roles.clone()),
            None => (String::new(), Vec::new()),
        };
        let Some(user) = self.state.form.to_user(&id, None, roles) else {
            self.state.form_has_errors = true;
            return false;
        };

        self.state.is_loading = true;
        let result = UpdateUser::new(&self.app.users).execute(&user);
        self.state.is_loading = false;
        match result {
            Ok(updated) => {
                info!("Profile of {} updated", updated.id);
                self.state.user = Some(updated);
                self.state.update_success = true;
                self.state.api_error = None;
                true
            }
            Err(e) => {
                self.state.api_error = Some(e.to_string());
                false
            }
        }
    }

    pub fn on_update_success_dismissed(&mut self) {
        self.state.update_success = false;
    }
}
