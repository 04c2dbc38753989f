//! Scripted control panel for offline rendering.

use std::collections::BTreeSet;

use trem_platform::{ControlId, ControlState, ControlType, PlatformController, ids};

/// Which output line changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Relay,
    Mute,
}

/// A relay or mute line change, stamped with the block it was driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub block: usize,
    pub line: Line,
    pub high: bool,
}

/// Panel with fixed knobs and a footswitch pressed for one block at each
/// scheduled block index.
///
/// The footswitch is released for at least one block between presses, so
/// every press is a separate rising edge. A press that lands on or right
/// after the previous one moves later.
#[derive(Debug)]
pub struct OfflinePanel {
    knobs: [f32; 3],
    presses: BTreeSet<usize>,
    block: usize,
    footswitch: bool,
    leds: [f32; 2],
    relay: Option<bool>,
    mute: Option<bool>,
    events: Vec<LineEvent>,
}

impl OfflinePanel {
    pub fn new(knobs: [f32; 3], presses: impl IntoIterator<Item = usize>) -> Self {
        let mut requested: Vec<usize> = presses.into_iter().collect();
        requested.sort_unstable();

        let mut scheduled = BTreeSet::new();
        let mut earliest = 0;
        for block in requested {
            let block = block.max(earliest);
            scheduled.insert(block);
            earliest = block + 2;
        }

        Self {
            knobs,
            presses: scheduled,
            block: 0,
            footswitch: false,
            leds: [0.0; 2],
            relay: None,
            mute: None,
            events: Vec::new(),
        }
    }

    /// LED levels after the last block.
    pub fn leds(&self) -> [f32; 2] {
        self.leds
    }

    /// Every relay and mute change, first drive included.
    pub fn events(&self) -> &[LineEvent] {
        &self.events
    }

    fn drive(&mut self, line: Line, high: bool) {
        let level = match line {
            Line::Relay => &mut self.relay,
            Line::Mute => &mut self.mute,
        };
        if *level != Some(high) {
            *level = Some(high);
            self.events.push(LineEvent {
                block: self.block,
                line,
                high,
            });
        }
    }
}

const CONTROLS: [ControlId; 8] = [
    ids::KNOB_RATE,
    ids::KNOB_DEPTH,
    ids::KNOB_MOD_RATE,
    ids::FOOTSWITCH,
    ids::LED_EFFECT,
    ids::LED_ENVELOPE,
    ids::RELAY_BYPASS,
    ids::MUTE,
];

impl PlatformController for OfflinePanel {
    fn control_count(&self) -> usize {
        CONTROLS.len()
    }

    fn control_id(&self, index: usize) -> Option<ControlId> {
        CONTROLS.get(index).copied()
    }

    fn control_type(&self, id: ControlId) -> Option<ControlType> {
        ids::control_type(id)
    }

    fn read_control(&self, id: ControlId) -> Option<ControlState> {
        let value = match id {
            ids::KNOB_RATE => self.knobs[0],
            ids::KNOB_DEPTH => self.knobs[1],
            ids::KNOB_MOD_RATE => self.knobs[2],
            ids::FOOTSWITCH => f32::from(u8::from(self.footswitch)),
            _ => return None,
        };
        Some(ControlState::new(value))
    }

    fn write_control(&mut self, id: ControlId, value: f32) -> bool {
        match id {
            ids::LED_EFFECT => self.leds[0] = value,
            ids::LED_ENVELOPE => self.leds[1] = value,
            ids::RELAY_BYPASS => self.drive(Line::Relay, value >= 0.5),
            ids::MUTE => self.drive(Line::Mute, value >= 0.5),
            _ => return false,
        }
        true
    }

    fn poll(&mut self) {
        self.footswitch = self.presses.contains(&self.block);
    }

    fn flush(&mut self) {
        self.block += 1;
    }
}
