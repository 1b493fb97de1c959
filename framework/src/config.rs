use bitflags::bitflags;

bitflags! {
    /// `View.SYSTEM_UI_FLAG_*` bits. The bits are additive; the platform
    /// consumes their union through `setSystemUiVisibility`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SystemUiFlags: u32 {
        const HIDE_NAVIGATION = 0x0000_0002;
        const FULLSCREEN = 0x0000_0004;
        const LAYOUT_STABLE = 0x0000_0100;
        const LAYOUT_HIDE_NAVIGATION = 0x0000_0200;
        const LAYOUT_FULLSCREEN = 0x0000_0400;
        const IMMERSIVE_STICKY = 0x0000_1000;
    }
}

impl SystemUiFlags {
    /// Sticky immersive fullscreen: content is laid out under both system
    /// bars and the bars stay hidden until swiped back in.
    pub const fn immersive_fullscreen() -> Self {
        Self::IMMERSIVE_STICKY
            .union(Self::LAYOUT_STABLE)
            .union(Self::LAYOUT_HIDE_NAVIGATION)
            .union(Self::LAYOUT_FULLSCREEN)
            .union(Self::HIDE_NAVIGATION)
            .union(Self::FULLSCREEN)
    }
}

/// `WindowManager.LayoutParams.LAYOUT_IN_DISPLAY_CUTOUT_MODE_*` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CutoutMode {
    Default = 0,
    ShortEdges = 1,
    Never = 2,
    Always = 3,
}

/// Window configuration applied during bootstrap, before the event loop
/// takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub cutout_mode: CutoutMode,
    pub ui_flags: SystemUiFlags,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            cutout_mode: CutoutMode::ShortEdges,
            ui_flags: SystemUiFlags::immersive_fullscreen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CutoutMode, SystemUiFlags, WindowConfig};

    #[test]
    fn immersive_union_matches_platform_mask() {
        assert_eq!(SystemUiFlags::immersive_fullscreen().bits(), 0x1706);
    }

    #[test]
    fn immersive_union_is_exactly_six_flags() {
        let flags = SystemUiFlags::immersive_fullscreen();
        assert_eq!(flags.iter().count(), 6);
        for flag in [
            SystemUiFlags::IMMERSIVE_STICKY,
            SystemUiFlags::LAYOUT_STABLE,
            SystemUiFlags::LAYOUT_HIDE_NAVIGATION,
            SystemUiFlags::LAYOUT_FULLSCREEN,
            SystemUiFlags::HIDE_NAVIGATION,
            SystemUiFlags::FULLSCREEN,
        ] {
            assert!(flags.contains(flag));
        }
    }

    #[test]
    fn cutout_modes_match_platform_constants() {
        assert_eq!(CutoutMode::Default as i32, 0);
        assert_eq!(CutoutMode::ShortEdges as i32, 1);
        assert_eq!(CutoutMode::Never as i32, 2);
        assert_eq!(CutoutMode::Always as i32, 3);
    }

    #[test]
    fn default_config_extends_into_cutout_and_hides_system_ui() {
        let config = WindowConfig::default();
        assert_eq!(config.cutout_mode, CutoutMode::ShortEdges);
        assert_eq!(config.ui_flags, SystemUiFlags::immersive_fullscreen());
    }
}
