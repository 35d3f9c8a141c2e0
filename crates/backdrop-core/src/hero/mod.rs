pub mod envelope;
pub mod machine;
pub mod media;
pub mod shuffle;
pub mod wormhole;

pub use envelope::{WarpCurve, WarpSample, WarpWindow};
pub use machine::{HeroCommand, HeroEvent, HeroMachine};
pub use media::{HeroMediaConfig, HeroSwapVideo, VideoSource};
pub use shuffle::{Cooldown, SwapShuffle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroPhase {
    Intro,
    Loop,
    Swap,
}

/// One of the three stacked `<video>` elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Intro,
    Loop,
    Swap,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Intro, Slot::Loop, Slot::Swap];

    pub fn index(self) -> usize {
        match self {
            Slot::Intro => 0,
            Slot::Loop => 1,
            Slot::Swap => 2,
        }
    }
}
