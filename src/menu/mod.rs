//! Pause Menu Screen Machine
//!
//! Drives the escape-menu navigation and owns the writer side of the
//! input [`SuspendHandle`]: gameplay input is suspended exactly while a
//! menu surface is visible, and the cursor is released over the same
//! window. Panel drawing belongs to the host UI layer; this module only
//! decides which screen is up.

use tracing::debug;

use crate::player::input::SuspendHandle;

/// Tabs inside the options screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OptionsTab {
    /// Resolution / monitor settings.
    #[default]
    Display,
    /// Quality settings.
    Graphics,
    /// Volume settings.
    Audio,
    /// Bindings.
    Controls,
}

/// Which menu surface is currently visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MenuScreen {
    /// No menu; gameplay input flows.
    #[default]
    Hidden,
    /// The root escape menu.
    Root,
    /// The options screen, on a given tab.
    Options(OptionsTab),
    /// "Really quit?" confirmation.
    QuitConfirm,
}

/// The pause menu state machine.
pub struct PauseMenu {
    screen: MenuScreen,
    suspend: SuspendHandle,
}

impl PauseMenu {
    /// Create a closed menu owning the given suspend handle.
    pub fn new(suspend: SuspendHandle) -> Self {
        suspend.set(false);
        Self {
            screen: MenuScreen::Hidden,
            suspend,
        }
    }

    /// The currently visible screen.
    pub fn screen(&self) -> MenuScreen {
        self.screen
    }

    /// True while any menu surface is up.
    pub fn is_open(&self) -> bool {
        self.screen != MenuScreen::Hidden
    }

    /// True while the OS cursor should be released (not locked to the
    /// view). Tracks `is_open` exactly.
    pub fn cursor_released(&self) -> bool {
        self.is_open()
    }

    /// Escape key. Surfaces close in priority order: the quit
    /// confirmation first, then options back to the root menu, then the
    /// root menu toggles.
    pub fn escape(&mut self) {
        match self.screen {
            MenuScreen::QuitConfirm => self.set_screen(MenuScreen::Root),
            MenuScreen::Options(_) => self.set_screen(MenuScreen::Root),
            MenuScreen::Root => self.set_screen(MenuScreen::Hidden),
            MenuScreen::Hidden => self.set_screen(MenuScreen::Root),
        }
    }

    /// Close everything and return to gameplay.
    pub fn resume(&mut self) {
        self.set_screen(MenuScreen::Hidden);
    }

    /// Root menu -> options, opening on the display tab.
    pub fn open_options(&mut self) {
        if self.screen == MenuScreen::Root {
            self.set_screen(MenuScreen::Options(OptionsTab::Display));
        }
    }

    /// Switch tabs while the options screen is up.
    pub fn select_tab(&mut self, tab: OptionsTab) {
        if matches!(self.screen, MenuScreen::Options(_)) {
            self.screen = MenuScreen::Options(tab);
        }
    }

    /// Options back button: return to the root menu.
    pub fn back(&mut self) {
        if matches!(self.screen, MenuScreen::Options(_)) {
            self.set_screen(MenuScreen::Root);
        }
    }

    /// Root menu -> quit confirmation.
    pub fn request_quit(&mut self) {
        if self.screen == MenuScreen::Root {
            self.set_screen(MenuScreen::QuitConfirm);
        }
    }

    /// Dismiss the quit confirmation.
    pub fn cancel_quit(&mut self) {
        if self.screen == MenuScreen::QuitConfirm {
            self.set_screen(MenuScreen::Root);
        }
    }

    /// Confirm quitting. Returns true when the host should leave the
    /// session and shut down; the menu itself just closes.
    pub fn confirm_quit(&mut self) -> bool {
        if self.screen == MenuScreen::QuitConfirm {
            self.set_screen(MenuScreen::Hidden);
            debug!("quit confirmed");
            true
        } else {
            false
        }
    }

    fn set_screen(&mut self, screen: MenuScreen) {
        let was_open = self.is_open();
        self.screen = screen;
        let open = self.is_open();
        if open != was_open {
            self.suspend.set(open);
            debug!(open, "pause menu toggled");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
