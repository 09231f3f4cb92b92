//! View seam: the closed input alphabet and the passive display surface

use super::event::Event;
use super::model::Screen;

/// Every user interaction the view can report. One closed alphabet instead
/// of per-button streams, so the mediator dispatches over a single table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    /// Play button on the main menu
    PlayClicked,
    /// Store button on the main menu
    StoreClicked,
    /// Settings button (present on the main and play menus)
    SettingsClicked,
    /// Back button on the settings menu
    SettingsBackClicked,
    /// Exit button on the play menu
    ExitClicked,
    /// Back-to-main button on the results menu
    ResultsBackClicked,
    /// Select button on the store menu
    StoreSelectClicked,
    LeftArrowClicked,
    RightArrowClicked,
    MusicSliderChanged(f32),
    SfxSliderChanged(f32),
}

/// Passive display surface. Implementations keep interior-mutable widget
/// state; the presenter is the only caller of the display operations.
pub trait View {
    /// Stream of user interactions.
    fn events(&self) -> &Event<ViewEvent>;

    fn set_screen_visible(&self, screen: Screen, visible: bool);
    /// Arrow-control cluster, shown on the play and store screens.
    fn set_controls_visible(&self, visible: bool);

    fn display_elapsed(&self, secs: u32);
    fn display_record(&self, secs: u32);
    fn display_stars(&self, stars: u32);
    /// Final readouts shown on the results screen.
    fn display_final_time(&self, secs: u32);
    fn display_final_stars(&self, stars: u32);

    fn display_music_slider(&self, value: f32);
    fn display_sfx_slider(&self, value: f32);
    /// Transient user-facing message line (store outcomes).
    fn show_notice(&self, text: &str);

    /// True while the user is actively dragging the music slider; the
    /// display is not pushed back to it during a drag.
    fn music_slider_held(&self) -> bool;
    fn sfx_slider_held(&self) -> bool;
    /// True while the left arrow control is held down.
    fn left_arrow_held(&self) -> bool;
    fn right_arrow_held(&self) -> bool;
}
