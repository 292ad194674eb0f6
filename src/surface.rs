// The seam between the session logic and whatever renders a tab.
// The desktop binary implements this for Tauri webviews.

use std::cell::RefCell;

/// One tab's embedded rendering surface.
///
/// Fetching, rendering and the page's own back/forward list live inside the
/// engine. Methods are fire-and-forget: a surface that fails to act logs and
/// moves on.
pub trait RenderingSurface {
    fn navigate(&self, url: &str);
    fn back(&self);
    fn forward(&self);
    fn reload(&self);
    fn stop(&self);
    fn current_url(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    Navigate(String),
    Back,
    Forward,
    Reload,
    Stop,
}

impl SurfaceCommand {
    pub fn apply<S: RenderingSurface + ?Sized>(&self, surface: &S) {
        match self {
            Self::Navigate(url) => surface.navigate(url),
            Self::Back => surface.back(),
            Self::Forward => surface.forward(),
            Self::Reload => surface.reload(),
            Self::Stop => surface.stop(),
        }
    }
}

/// Collects commands now and plays them onto a real surface later.
///
/// Engines may call back into the session synchronously while navigating,
/// so the shell runs handlers against this queue under the session lock and
/// replays it once the lock is released.
#[derive(Debug, Default)]
pub struct DeferredSurface {
    commands: RefCell<Vec<SurfaceCommand>>,
    url: Option<String>,
}

impl DeferredSurface {
    pub fn new(current_url: Option<String>) -> Self {
        Self {
            commands: RefCell::default(),
            url: current_url,
        }
    }

    pub fn commands(&self) -> Vec<SurfaceCommand> {
        self.commands.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn replay<S: RenderingSurface + ?Sized>(self, surface: &S) {
        for command in self.commands.into_inner() {
            command.apply(surface);
        }
    }

    fn push(&self, command: SurfaceCommand) {
        self.commands.borrow_mut().push(command);
    }
}

impl RenderingSurface for DeferredSurface {
    fn navigate(&self, url: &str) {
        self.push(SurfaceCommand::Navigate(url.to_string()));
    }
    fn back(&self) {
        self.push(SurfaceCommand::Back);
    }
    fn forward(&self) {
        self.push(SurfaceCommand::Forward);
    }
    fn reload(&self) {
        self.push(SurfaceCommand::Reload);
    }
    fn stop(&self) {
        self.push(SurfaceCommand::Stop);
    }
    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_preserves_order() {
        let queued = DeferredSurface::default();
        queued.navigate("https://a.com");
        queued.back();
        queued.reload();

        let target = DeferredSurface::default();
        queued.replay(&target);

        assert_eq!(
            target.commands(),
            vec![
                SurfaceCommand::Navigate("https://a.com".to_string()),
                SurfaceCommand::Back,
                SurfaceCommand::Reload,
            ]
        );
    }

    #[test]
    fn test_navigations_filters_other_commands() {
        let queued = DeferredSurface::new(Some("https://start.com".to_string()));
        queued.stop();
        queued.navigate("https://b.com");
        queued.forward();

        assert_eq!(queued.navigations(), vec!["https://b.com"]);
        assert_eq!(queued.current_url().as_deref(), Some("https://start.com"));
    }
}
