use std::fmt;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePanel {
    #[default]
    Targets,
    Logs,
}

impl ActivePanel {
    /// Cycle to the next panel.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Targets => Self::Logs,
            Self::Logs => Self::Targets,
        }
    }
}

impl fmt::Display for ActivePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Targets => write!(f, "Targets"),
            Self::Logs => write!(f, "Logs"),
        }
    }
}

/// Which field of the add form is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Address,
    Probe,
}

impl FormField {
    /// Toggle between the two fields.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Address => Self::Probe,
            Self::Probe => Self::Address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_panel_cycles() {
        assert_eq!(ActivePanel::Targets.next(), ActivePanel::Logs);
        assert_eq!(ActivePanel::Logs.next(), ActivePanel::Targets);
    }

    #[test]
    fn form_field_toggles() {
        assert_eq!(FormField::Address.toggle(), FormField::Probe);
        assert_eq!(FormField::Probe.toggle(), FormField::Address);
    }

    #[test]
    fn active_panel_display() {
        assert_eq!(ActivePanel::Targets.to_string(), "Targets");
        assert_eq!(ActivePanel::Logs.to_string(), "Logs");
    }
}
