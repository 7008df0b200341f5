/// Host-side focus primitive the console delegates to.
///
/// Implementors own whatever "focused" means on their platform (a visible
/// terminal cursor, a widget's keyboard focus). The console only forwards.
pub trait FocusTarget {
    fn focus(&mut self);
    fn blur(&mut self);
}

/// Focus target for hosts without focus management.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFocus;

impl FocusTarget for NoopFocus {
    fn focus(&mut self) {}
    fn blur(&mut self) {}
}

impl<T: FocusTarget + ?Sized> FocusTarget for &mut T {
    fn focus(&mut self) {
        (**self).focus()
    }
    fn blur(&mut self) {
        (**self).blur()
    }
}
