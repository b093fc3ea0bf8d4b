//! Edit-mode state machine

use serde::{Deserialize, Serialize};
use tracing::info;
use view_types::EditMode;

use crate::error::{SessionError, SessionResult};

/// What happens when one edit mode is requested while the other is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSwitchPolicy {
    /// Program editing closes content editing; content editing must wait
    /// for program editing to be closed explicitly
    #[default]
    ProgramPreempts,
    /// Either mode closes the other
    Symmetric,
}

/// How a request for an edit mode must be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Viewing; the password is required
    Unlock,
    /// Save and close `from`, then enter without asking again
    Switch { from: EditMode },
    AlreadyActive,
    Refuse { active: EditMode },
}

#[derive(Debug, Clone)]
pub struct EditSession {
    mode: EditMode,
    policy: ModeSwitchPolicy,
}

impl EditSession {
    pub fn new(policy: ModeSwitchPolicy) -> Self {
        Self {
            mode: EditMode::Viewing,
            policy,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn policy(&self) -> ModeSwitchPolicy {
        self.policy
    }

    /// Decides how to reach the edit mode `target`
    pub fn request(&self, target: EditMode) -> Transition {
        match (self.mode, target) {
            (current, target) if current == target => Transition::AlreadyActive,
            (EditMode::Viewing, _) => Transition::Unlock,
            (_, EditMode::Viewing) => Transition::AlreadyActive,
            (EditMode::ContentEditing, EditMode::ProgramEditing) => Transition::Switch {
                from: EditMode::ContentEditing,
            },
            (EditMode::ProgramEditing, EditMode::ContentEditing) => match self.policy {
                ModeSwitchPolicy::Symmetric => Transition::Switch {
                    from: EditMode::ProgramEditing,
                },
                ModeSwitchPolicy::ProgramPreempts => Transition::Refuse {
                    active: EditMode::ProgramEditing,
                },
            },
            (current, _) => Transition::Refuse { active: current },
        }
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "edit mode changed");
            self.mode = mode;
        }
    }

    /// Fails unless the session is in `expected`
    pub fn require(&self, expected: EditMode) -> SessionResult<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(SessionError::WrongMode {
                expected,
                actual: self.mode,
            })
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(ModeSwitchPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_in(mode: EditMode, policy: ModeSwitchPolicy) -> EditSession {
        let mut session = EditSession::new(policy);
        session.set_mode(mode);
        session
    }

    #[test]
    fn test_initial_state() {
        let session = EditSession::default();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.policy(), ModeSwitchPolicy::ProgramPreempts);
    }

    #[test]
    fn test_viewing_requires_password() {
        let session = EditSession::default();
        assert_eq!(session.request(EditMode::ContentEditing), Transition::Unlock);
        assert_eq!(session.request(EditMode::ProgramEditing), Transition::Unlock);
    }

    #[test]
    fn test_program_preempts_content() {
        let session = session_in(EditMode::ContentEditing, ModeSwitchPolicy::ProgramPreempts);
        assert_eq!(
            session.request(EditMode::ProgramEditing),
            Transition::Switch {
                from: EditMode::ContentEditing
            }
        );
        assert_eq!(session.request(EditMode::ContentEditing), Transition::AlreadyActive);
    }

    #[test]
    fn test_content_refused_while_program_active() {
        let session = session_in(EditMode::ProgramEditing, ModeSwitchPolicy::ProgramPreempts);
        assert_eq!(
            session.request(EditMode::ContentEditing),
            Transition::Refuse {
                active: EditMode::ProgramEditing
            }
        );
    }

    #[test]
    fn test_symmetric_policy() {
        let session = session_in(EditMode::ProgramEditing, ModeSwitchPolicy::Symmetric);
        assert_eq!(
            session.request(EditMode::ContentEditing),
            Transition::Switch {
                from: EditMode::ProgramEditing
            }
        );
    }

    #[test]
    fn test_require() {
        let session = session_in(EditMode::ContentEditing, ModeSwitchPolicy::default());
        assert!(session.require(EditMode::ContentEditing).is_ok());
        assert!(matches!(
            session.require(EditMode::ProgramEditing),
            Err(SessionError::WrongMode {
                expected: EditMode::ProgramEditing,
                actual: EditMode::ContentEditing
            })
        ));
    }

    #[test]
    fn test_policy_wire_names() {
        let policy: ModeSwitchPolicy = serde_json::from_str("\"symmetric\"").unwrap();
        assert_eq!(policy, ModeSwitchPolicy::Symmetric);
    }
}
