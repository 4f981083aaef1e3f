use crate::abi::ActionInfo;

/// Veto hooks attached to a `(target, selector)` pair.
///
/// Each hook returns `Err(reason)` to reject. Hooks left unimplemented accept.
pub trait ActionGuard: ActionGuardClone {
    fn validate_action_creation(&mut self, _info: &ActionInfo) -> Result<(), String> {
        Ok(())
    }

    fn validate_pre_action_execution(&mut self, _info: &ActionInfo) -> Result<(), String> {
        Ok(())
    }

    fn validate_post_action_execution(&mut self, _info: &ActionInfo) -> Result<(), String> {
        Ok(())
    }
}

pub trait ActionGuardClone {
    fn clone_box(&self) -> Box<dyn ActionGuard>;
}

impl<T> ActionGuardClone for T
where
    T: ActionGuard + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn ActionGuard> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ActionGuard> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
