/// Shared tuning constants.
///
/// Renderer-specific numbers live next to the renderer that uses them; what
/// is here is shared between the loop policy, the hero player and the
/// web front-end.
// Frame delta clamp (seconds); larger gaps (tab switch) are treated as one slow frame
pub const MAX_FRAME_DT_SEC: f32 = 0.033;

// Canvas backing-store scale is capped so 3x phones don't triple the fill cost
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Viewport width below which the layout counts as mobile (CSS px)
pub const MOBILE_MAX_WIDTH: f64 = 768.0;

// Custom DOM event that starts a spool burst on every warp-family renderer
pub const SPOOL_EVENT: &str = "warpfield:spool";

// CSS custom property written by the hero distortion sampler
pub const HERO_WARP_PROPERTY: &str = "--hero-warp";

// Hero intro/loop handoff (seconds)
pub const INTRO_FREEZE_WINDOW_SEC: f64 = 0.1;
pub const INTRO_FREEZE_BACKOFF_SEC: f64 = 0.04;

// Loop restarts attempted after play() rejections before the player stalls
pub const LOOP_PLAY_RETRIES: u32 = 3;

// Swap insertion
pub const SWAP_SKIP_CHANCE: f64 = 0.28;
pub const SWAP_COOLDOWN_LOOPS: u32 = 2;

// HTMLMediaElement.readyState value required before a swap clip may start
pub const HAVE_FUTURE_DATA: u16 = 3;

// Peak feDisplacementMap scale at full warp intensity
pub const HERO_WARP_MAX_DISPLACEMENT: f32 = 38.0;
