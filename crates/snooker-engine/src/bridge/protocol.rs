/// Frame buffer layout shared with the TypeScript host.
/// Must stay in sync with `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 8 floats]
/// [Vectors: max_vector_vertices × 6 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header at init and never change.
/// Counts and the frame counter are rewritten after every tick.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_WORLD_WIDTH: usize = 2;
pub const HEADER_WORLD_HEIGHT: usize = 3;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 4;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per vector vertex: x, y, r, g, b, a. Fixed wire format.
pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Floats per game event: kind, a, b, c. Fixed wire format.
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub world_width: f32,
    pub world_height: f32,
    /// Maximum vector vertices per frame.
    pub max_vector_vertices: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    /// Offset (in floats) where vector data begins.
    pub vector_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(world_width: f32, world_height: f32, max_vector_vertices: usize, max_events: usize) -> Self {
        let vector_data_offset = HEADER_FLOATS;
        let event_data_offset = vector_data_offset + max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;

        Self {
            world_width,
            world_height,
            max_vector_vertices,
            max_events,
            vector_data_offset,
            event_data_offset,
            buffer_total_floats,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.world_width,
            config.world_height,
            config.max_vector_vertices,
            config.max_events,
        )
    }

    /// Total buffer size in bytes.
    pub fn buffer_total_bytes(&self) -> usize {
        self.buffer_total_floats * 4
    }

    /// Header for one frame. Counts beyond capacity are clamped; the host
    /// never reads past the sections it allocated.
    pub fn header(&self, frame: u64, vector_vertices: usize, events: usize) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = frame as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_WORLD_WIDTH] = self.world_width;
        header[HEADER_WORLD_HEIGHT] = self.world_height;
        header[HEADER_MAX_VECTOR_VERTICES] = self.max_vector_vertices as f32;
        header[HEADER_VECTOR_VERTEX_COUNT] = vector_vertices.min(self.max_vector_vertices) as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = events.min(self.max_events) as f32;
        header
    }
}
