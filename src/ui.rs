use std::time::Duration;

use tokio::time::sleep;

use crate::client::SearchClient;
use crate::render::{RenderedResults, render_results};

/// Delay before the configuration popup dismisses itself.
pub const POPUP_AUTO_DISMISS: Duration = Duration::from_millis(5000);
/// Length of the slide-out transition before the popup is hidden for good.
pub const POPUP_SLIDE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Visible,
    SlidingOut,
    Hidden,
}

/// The notification popup shown on page load.
#[derive(Debug, Default)]
pub struct Popup {
    state: PopupState,
}

impl Popup {
    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn is_hidden(&self) -> bool {
        self.state == PopupState::Hidden
    }

    /// Slide out, then hide. Already hidden is a no-op, so this can run any
    /// number of times.
    pub async fn dismiss(&mut self) {
        if self.state == PopupState::Hidden {
            return;
        }
        self.state = PopupState::SlidingOut;
        sleep(POPUP_SLIDE_OUT).await;
        self.state = PopupState::Hidden;
    }

    /// The one-shot timer armed on page load.
    pub async fn auto_dismiss(&mut self) {
        sleep(POPUP_AUTO_DISMISS).await;
        self.dismiss().await;
    }
}

/// Visibility and interaction state of the page regions. `error` doubles as
/// the banner's visibility and its text, `results` as the section's
/// visibility and its content.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub loading: bool,
    pub error: Option<String>,
    pub results: Option<RenderedResults>,
    pub button_disabled: bool,
}

/// Drives the search form against a running instance.
///
/// The submit button is disabled before the request starts and re-enabled
/// once the outcome is handled, so a second submission cannot overlap the
/// first. There is no other overlap guard.
pub struct SearchPage {
    client: SearchClient,
    /// `None` models a page without the popup element; dismissing is then a
    /// no-op.
    pub popup: Option<Popup>,
    pub state: PageState,
}

impl SearchPage {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client,
            popup: Some(Popup::default()),
            state: PageState::default(),
        }
    }

    /// Dismiss the popup if the page has one.
    pub async fn close_popup(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.dismiss().await;
        }
    }

    /// One form submission: reset the regions, disable the button, run the
    /// request, then restore loading and the button whatever happened.
    pub async fn submit(&mut self, email: &str) {
        self.state.loading = true;
        self.state.error = None;
        self.state.results = None;
        self.state.button_disabled = true;

        match self.client.search(email).await {
            Ok(response) => self.state.results = Some(render_results(&response)),
            Err(err) => self.state.error = Some(err.to_string()),
        }

        self.state.loading = false;
        self.state.button_disabled = false;
    }
}
