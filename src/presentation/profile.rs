use crate::app::App;
use crate::models::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub api_error: Option<String>,
    pub is_network_available: bool,
}

impl Default for ProfileState {
    fn default() -> Self {
        ProfileState {
            user: None,
            is_loading: true,
            api_error: None,
            is_network_available: true,
        }
    }
}

pub struct ProfileHolder<'a> {
    app: &'a App,
    pub state: ProfileState,
}

impl<'a> ProfileHolder<'a> {
    pub fn new(app: &'a App) -> Self {
        ProfileHolder {
            app,
            state: ProfileState::default(),
        }
    }

    pub fn load(&mut self) {
        self.state.is_loading = true;
        self.state.is_network_available = self.app.is_network_available();
        match self.app.get_user().execute() {
            Ok(user) => {
                self.state.user = Some(user);
                self.state.api_error = None;
            }
            Err(e) => self.state.api_error = Some(e.to_string()),
        }
        self.state.is_loading = false;
    }
}
