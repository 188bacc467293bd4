pub mod assets;
pub mod camera_fade;
pub mod curve;
pub mod logging;
pub mod scene;
pub mod time;
pub mod timer;

pub use assets::AssetRef;
pub use camera_fade::CameraFade;
pub use curve::FloatCurve;
pub use time::Time;
pub use timer::{TimerHandle, TimerManager};
