//! Adjacency bookkeeping for a passive speaker.
//!
//! One adjacency per neighbour MAC and level. The first LAN hello from a neighbour creates it
//! in `Initializing`; any later hello moves it to `Up`. Timers and teardown are left to the
//! caller, which owns the clock.
use bytes::Bytes;
use log::{debug, info};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::isis::hello::{build_lan_hello, IsisSpeakerConfig, HOLD_MULTIPLIER};
use crate::parser::utils::mac_to_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdjacencyState {
    Initializing,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Adjacency {
    pub state: AdjacencyState,
    pub level: IsisLevel,
    pub neighbor_mac: [u8; 6],
    pub neighbor_id: [u8; 6],
    pub neighbor_lan_id: [u8; 7],
    pub neighbor_areas: Vec<Bytes>,
    /// Hold timer announced by the neighbour.
    pub hold_timer: u16,
    pub last_rx: Instant,
    /// The hello to send to this neighbour next.
    pub next_tx: IsisFrame,
}

#[derive(Debug, Clone)]
pub struct AdjacencyTable {
    config: IsisSpeakerConfig,
    adjacencies: BTreeMap<([u8; 6], IsisLevel), Adjacency>,
}

impl AdjacencyTable {
    pub fn new(config: IsisSpeakerConfig) -> AdjacencyTable {
        AdjacencyTable {
            config,
            adjacencies: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &IsisSpeakerConfig {
        &self.config
    }

    pub fn get(&self, mac: &[u8; 6], level: IsisLevel) -> Option<&Adjacency> {
        self.adjacencies.get(&(*mac, level))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adjacency> {
        self.adjacencies.values()
    }

    pub fn len(&self) -> usize {
        self.adjacencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacencies.is_empty()
    }

    /// MACs of all neighbours known at `level`.
    pub fn neighbors(&self, level: IsisLevel) -> Vec<[u8; 6]> {
        self.adjacencies
            .keys()
            .filter(|(_, l)| *l == level)
            .map(|(mac, _)| *mac)
            .collect()
    }

    /// Feed a received frame. Returns the adjacency the frame updated, or `None` when the
    /// frame is not a LAN hello.
    pub fn process_frame(
        &mut self,
        frame: &IsisFrame,
        now: Instant,
    ) -> Result<Option<&Adjacency>, ParserError> {
        let level = match frame.pdu.header.pdu_type.hello_level() {
            Some(level) => level,
            None => return Ok(None),
        };
        let hello = match &frame.pdu.body {
            IsisPduBody::LanHello(hello) => hello,
            _ => return Ok(None),
        };
        let key = (frame.mac.src_mac, level);

        if self.adjacencies.contains_key(&key) {
            let next_tx = build_lan_hello(
                &self.config,
                level,
                &hello.lan_id,
                self.config.hold_timer.saturating_mul(HOLD_MULTIPLIER),
                &self.neighbors(level),
            )?;
            let adj = self
                .adjacencies
                .get_mut(&key)
                .ok_or_else(|| ParserError::malformed("adjacency vanished"))?;
            if adj.state != AdjacencyState::Up {
                info!(
                    "adjacency with {} at {:?} is up",
                    mac_to_string(&key.0),
                    level
                );
            }
            adj.state = AdjacencyState::Up;
            adj.neighbor_lan_id = hello.lan_id;
            adj.neighbor_areas = hello.tlvs.area_addresses();
            adj.hold_timer = hello.hold_timer;
            adj.last_rx = now;
            adj.next_tx = next_tx;
        } else {
            debug!(
                "new adjacency with {} at {:?}",
                mac_to_string(&key.0),
                level
            );
            let next_tx = build_lan_hello(
                &self.config,
                level,
                &self.config.lan_id,
                self.config.hold_timer,
                &self.neighbors(level),
            )?;
            self.adjacencies.insert(
                key,
                Adjacency {
                    state: AdjacencyState::Initializing,
                    level,
                    neighbor_mac: key.0,
                    neighbor_id: hello.source_id,
                    neighbor_lan_id: hello.lan_id,
                    neighbor_areas: hello.tlvs.area_addresses(),
                    hold_timer: hello.hold_timer,
                    last_rx: now,
                    next_tx,
                },
            );
        }
        Ok(self.adjacencies.get(&key))
    }
}
