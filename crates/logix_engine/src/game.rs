use crate::engine::Engine;

/// A game's answer to a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseVote {
    Accept,
    Veto,
}

/// The hooks a game implements. The host calls them on the event-loop
/// thread; any `Err` or panic escaping a hook crashes the game safely.
pub trait Game {
    /// Runs before `load`, once the window and graphics context exist.
    fn pre_warm(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
        Ok(())
    }

    fn load(&mut self, engine: &mut Engine) -> anyhow::Result<()>;

    fn load_completed(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
        Ok(())
    }

    /// Fixed-rate update. `delta` is the time since the previous cycle in
    /// seconds.
    fn cycle(&mut self, engine: &mut Engine, delta: f64) -> anyhow::Result<()>;

    fn render(&mut self, engine: &mut Engine, delta: f64) -> anyhow::Result<()>;

    /// Last hook of a run. Tracked GPU resources are already released.
    fn shutdown(&mut self, engine: &mut Engine, crashed: bool);

    /// Only asked when the host allows cancelling a close. `None` accepts.
    fn close_requested(&mut self, _engine: &mut Engine) -> Option<CloseVote> {
        None
    }
}
