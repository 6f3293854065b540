use crate::model::Operation;

/// Visual state of one trigger control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    busy: bool,
}

impl ControlState {
    pub fn enabled(self) -> bool {
        !self.busy
    }

    pub fn label_visible(self) -> bool {
        !self.busy
    }

    pub fn spinner_visible(self) -> bool {
        self.busy
    }
}

/// Loading indicators for the Generate and Refine controls.
///
/// Each control is acquired when its request is issued and released when that request
/// settles. The orchestrator reports exactly one settle per issued request (even if the
/// request task fails abnormally), so every `acquire` is paired with a `release`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingControls {
    generate: ControlState,
    refine: ControlState,
}

impl LoadingControls {
    pub fn control(&self, op: Operation) -> ControlState {
        match op {
            Operation::Generate => self.generate,
            Operation::Refine => self.refine,
        }
    }

    fn control_mut(&mut self, op: Operation) -> &mut ControlState {
        match op {
            Operation::Generate => &mut self.generate,
            Operation::Refine => &mut self.refine,
        }
    }

    pub fn is_busy(&self, op: Operation) -> bool {
        self.control(op).busy
    }

    /// Enter the loading state. Returns false if the control is already disabled.
    pub fn acquire(&mut self, op: Operation) -> bool {
        let c = self.control_mut(op);
        if c.busy {
            return false;
        }
        c.busy = true;
        true
    }

    /// Restore label, hide spinner, re-enable. Idempotent.
    pub fn release(&mut self, op: Operation) {
        self.control_mut(op).busy = false;
    }

    pub fn any_busy(&self) -> bool {
        self.generate.busy || self.refine.busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_disables_only_its_control() {
        let mut l = LoadingControls::default();
        assert!(l.acquire(Operation::Generate));
        let g = l.control(Operation::Generate);
        assert!(!g.enabled() && g.spinner_visible() && !g.label_visible());
        assert!(l.control(Operation::Refine).enabled());
        assert!(!l.acquire(Operation::Generate));
        assert!(l.acquire(Operation::Refine));
    }

    #[test]
    fn release_restores_control() {
        let mut l = LoadingControls::default();
        l.acquire(Operation::Refine);
        l.release(Operation::Refine);
        l.release(Operation::Refine);
        let r = l.control(Operation::Refine);
        assert!(r.enabled() && r.label_visible() && !r.spinner_visible());
        assert!(!l.any_busy());
    }
}
