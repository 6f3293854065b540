use crate::controller::ViewState;
use crate::image::Thumbnail;

/// Vertical position of the result section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scroll {
    #[default]
    Top,
    /// Keep the image panel centered in the viewport.
    CenterImage,
    Offset(u16),
}

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Terminal-side state wrapped around the controller's [`ViewState`].
pub struct TuiState {
    pub view: ViewState,
    pub scroll: Scroll,
    /// Offset actually used by the last frame; PageUp/PageDown step from here.
    pub last_offset: u16,
    pub show_help: bool,
    pub spinner_frame: usize,
    thumb: Option<(u16, u16, Thumbnail)>,
}

impl TuiState {
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            scroll: Scroll::Top,
            last_offset: 0,
            show_help: false,
            spinner_frame: 0,
            thumb: None,
        }
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    pub fn invalidate_thumbnail(&mut self) {
        self.thumb = None;
    }

    /// Thumbnail of the current logo for a `cols` x `rows` cell area, cached per size.
    pub fn thumbnail(&mut self, cols: u16, rows: u16) -> Option<&Thumbnail> {
        let logo = self.view.logo.as_ref()?;
        let stale = !matches!(&self.thumb, Some((c, r, _)) if *c == cols && *r == rows);
        if stale {
            self.thumb = Some((cols, rows, logo.thumbnail(cols, rows)));
        }
        self.thumb.as_ref().map(|(_, _, t)| t)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.last_offset) + delta).max(0);
        self.scroll = Scroll::Offset(u16::try_from(next).unwrap_or(u16::MAX));
    }
}

/// Resolve a scroll request into a row offset for a column of `content_h` rows shown in
/// `viewport_h` rows, where the image panel occupies `image_top..image_top + image_h`.
pub fn resolve_offset(scroll: Scroll, content_h: u16, viewport_h: u16, image_top: u16, image_h: u16) -> u16 {
    let max = content_h.saturating_sub(viewport_h);
    match scroll {
        Scroll::Top => 0,
        Scroll::CenterImage => (image_top + image_h / 2)
            .saturating_sub(viewport_h / 2)
            .min(max),
        Scroll::Offset(o) => o.min(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{sample_png, RenderedLogo};
    use bytes::Bytes;

    #[test]
    fn center_image_clamps_to_content() {
        // Everything fits: no scrolling at all.
        assert_eq!(resolve_offset(Scroll::CenterImage, 30, 40, 6, 22), 0);
        // Image center at row 17, viewport of 20 rows: offset 7.
        assert_eq!(resolve_offset(Scroll::CenterImage, 36, 20, 6, 22), 7);
        assert_eq!(resolve_offset(Scroll::CenterImage, 36, 10, 6, 22), 12);
        assert_eq!(resolve_offset(Scroll::Offset(100), 36, 20, 6, 22), 16);
        assert_eq!(resolve_offset(Scroll::Top, 36, 20, 6, 22), 0);
    }

    #[test]
    fn thumbnail_is_cached_per_size() {
        let mut view = ViewState::new();
        view.logo = Some(RenderedLogo::from_png(Bytes::from(sample_png(16, 16))).unwrap());
        let mut s = TuiState::new(view);
        let first = s.thumbnail(8, 4).cloned().unwrap();
        assert_eq!(s.thumbnail(8, 4), Some(&first));
        assert_ne!(s.thumbnail(4, 2).map(|t| t.cols), Some(first.cols));

        s.view.logo = None;
        assert!(s.thumbnail(8, 4).is_none());
    }

    #[test]
    fn scroll_by_never_goes_negative() {
        let mut s = TuiState::new(ViewState::new());
        s.last_offset = 3;
        s.scroll_by(-5);
        assert_eq!(s.scroll, Scroll::Offset(0));
        s.scroll_by(4);
        assert_eq!(s.scroll, Scroll::Offset(7));
    }
}
