// When to show validation errors

use crate::Control;
use vadacl_config::VadaclConfig;

/// Whether a control's errors should be shown.
///
/// Never for a pristine or valid control. Otherwise always, unless
/// `only_after_touched` holds and the control was not touched yet.
pub fn should_show(control: &dyn Control, only_after_touched: bool) -> bool {
    if control.pristine() || control.valid() {
        return false;
    }
    !only_after_touched || control.touched()
}

/// Messages of a control's current errors, in recorded order.
///
/// Empty when there are no errors, or when `only_when_dirty` holds and the
/// control is pristine. Outcomes without a message are skipped.
pub fn visible_messages(control: &dyn Control, only_when_dirty: bool) -> Vec<String> {
    let Some(errors) = control.errors() else {
        return Vec::new();
    };
    if only_when_dirty && control.pristine() {
        return Vec::new();
    }
    errors.messages().into_iter().map(str::to_string).collect()
}

/// Display policy with configurable defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorVisibility {
    pub only_after_touched: bool,
    pub only_when_dirty: bool,
}

impl Default for ErrorVisibility {
    fn default() -> Self {
        Self {
            only_after_touched: true,
            only_when_dirty: true,
        }
    }
}

impl ErrorVisibility {
    pub fn from_config(config: &VadaclConfig) -> Self {
        Self {
            only_after_touched: config.only_after_touched,
            only_when_dirty: config.only_when_dirty,
        }
    }

    pub fn should_show(&self, control: &dyn Control) -> bool {
        should_show(control, self.only_after_touched)
    }

    pub fn messages(&self, control: &dyn Control) -> Vec<String> {
        visible_messages(control, self.only_when_dirty)
    }
}
