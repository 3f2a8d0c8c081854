/// ControllerRegistry defines the port (interface) the resolver uses to ask
/// whether a controller reference can be dispatched to.
///
/// Any `Fn(&str) -> bool` closure is a registry, which keeps tests and simple
/// hosts free of adapter boilerplate.
pub trait ControllerRegistry: Send + Sync {
    /// Check whether a fully-qualified controller reference exists
    ///
    /// # Arguments
    /// * `controller` - The controller reference, e.g. `App\Controller\Shop\WidgetsController`
    fn has(&self, controller: &str) -> bool;

    /// Check whether an existing controller dispatches any action on its own,
    /// so per-action controllers need not be looked up
    fn handles_any_action(&self, _controller: &str) -> bool {
        false
    }
}

impl<F> ControllerRegistry for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has(&self, controller: &str) -> bool {
        self(controller)
    }
}
