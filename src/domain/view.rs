use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// The three mutually exclusive dashboard modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Planner,
    Logger,
    Insights,
}

impl View {
    pub const ALL: [View; 3] = [View::Planner, View::Logger, View::Insights];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Planner => "planner",
            View::Logger => "logger",
            View::Insights => "insights",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Planner => "Workout planner",
            View::Logger => "Workout Logger",
            View::Insights => "Workout Insights",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = NavigationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "planner" | "plan" => Ok(View::Planner),
            "logger" | "log" => Ok(View::Logger),
            "insights" | "insight" => Ok(View::Insights),
            _ => Err(NavigationError {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    value: String,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown view '{}': expected one of {}",
            self.value,
            View::ALL
                .iter()
                .map(|view| view.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for NavigationError {}

/// Session-scoped view selection. `None` means nothing is selected and
/// rendering is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    selected: Option<View>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: Some(View::Planner),
        }
    }
}

impl ViewState {
    pub fn none() -> Self {
        Self { selected: None }
    }

    pub fn selected(self) -> Option<View> {
        self.selected
    }

    pub fn select(&mut self, view: View) {
        self.selected = Some(view);
    }

    /// Restores a stored selection. A missing value starts on the planner;
    /// an unreadable one falls back to no selection.
    pub fn restore(stored: Option<&str>) -> Self {
        match stored {
            None => Self::default(),
            Some(raw) => match View::from_str(raw) {
                Ok(view) => Self {
                    selected: Some(view),
                },
                Err(err) => {
                    tracing::debug!(error = %err, "ignoring stored view selection");
                    Self::none()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{View, ViewState};
    use std::str::FromStr;

    #[test]
    fn parses_names_and_short_aliases() {
        assert_eq!(View::from_str("Logger").unwrap(), View::Logger);
        assert_eq!(View::from_str(" log ").unwrap(), View::Logger);
        assert_eq!(View::from_str("insights").unwrap(), View::Insights);
        assert_eq!(View::from_str("plan").unwrap(), View::Planner);
    }

    #[test]
    fn unknown_view_is_a_navigation_error() {
        let err = View::from_str("stats").expect_err("unknown view should fail");
        assert_eq!(
            err.to_string(),
            "unknown view 'stats': expected one of planner, logger, insights"
        );
    }

    #[test]
    fn uninitialized_state_starts_on_planner() {
        assert_eq!(ViewState::restore(None).selected(), Some(View::Planner));
        assert_eq!(ViewState::default().selected(), Some(View::Planner));
    }

    #[test]
    fn unreadable_state_resolves_to_no_selection() {
        assert_eq!(ViewState::restore(Some("garbage")).selected(), None);
        assert_eq!(
            ViewState::restore(Some("insights")).selected(),
            Some(View::Insights)
        );
    }

    #[test]
    fn select_replaces_previous_choice() {
        let mut state = ViewState::none();
        state.select(View::Logger);
        assert_eq!(state.selected(), Some(View::Logger));
        state.select(View::Insights);
        assert_eq!(state.selected(), Some(View::Insights));
    }
}
