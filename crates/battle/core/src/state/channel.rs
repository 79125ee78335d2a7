use bitflags::bitflags;

use super::{AbilityId, ParticipantId};

bitflags! {
    /// What a channel prevents its caster from doing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ChannelFlags: u8 {
        const BLOCKS_MOVEMENT = 1 << 0;
        const BLOCKS_ACTIONS = 1 << 1;
    }
}

/// An ability mid-cast. Exists only between channel start and completion or
/// interruption.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelingState {
    pub ability_id: AbilityId,
    pub caster_id: ParticipantId,
    /// Target at cast time. Effects re-resolve their scope when they fire.
    pub target_id: Option<ParticipantId>,
    pub duration_ms: u32,
    pub elapsed_ms: u32,
    /// Interval of `ON_CHANNEL_TICK` effects, `None` when the ability has none.
    pub tick_interval_ms: Option<u32>,
    pub until_next_tick_ms: u32,
    pub flags: ChannelFlags,
}

impl ChannelingState {
    pub fn blocks_movement(&self) -> bool {
        self.flags.contains(ChannelFlags::BLOCKS_MOVEMENT)
    }

    pub fn blocks_actions(&self) -> bool {
        self.flags.contains(ChannelFlags::BLOCKS_ACTIONS)
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            1.0
        } else {
            self.elapsed_ms as f32 / self.duration_ms as f32
        }
    }
}
