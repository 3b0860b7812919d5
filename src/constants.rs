pub const WINDOW_WIDTH: i32 = 1280;           // Initial window width
pub const WINDOW_HEIGHT: i32 = 720;           // Initial window height
pub const FPS: u32 = 60;                      // Target frames per second

pub const PHASE_DURATION: f32 = 1.0;          // Outgoing / incoming slide and fade (seconds)
pub const COLOR_FADE_DURATION: f32 = 1.5;     // Background color cross-fade (seconds)
pub const STRIP_STRETCH: f32 = 2.0;           // Vertical scale of the strip while sliding

// Camera sits at the origin looking down -z
pub const CAMERA_FOVY: f32 = 45.0;

// Item slots, all on the z = -100 plane
pub const SPOTLIGHT_POSITION: [f32; 3] = [-35.0, 2.5, -100.0];
pub const BACKGROUND_POSITION: [f32; 3] = [-45.0, 2.5, -100.0];
pub const INTERMEDIATE_POSITION: [f32; 3] = [-25.0, 2.5, -100.0];

pub const STRIP_POSITION: [f32; 3] = [-30.0, 0.0, -100.0];
pub const STRIP_ROTATION: f32 = std::f32::consts::FRAC_PI_2;
