// ── Domain model ──
//
// Typed views of the records the Element IoT API returns. Unknown fields
// are ignored; fields the platform omits on some endpoints default.

mod device;
mod folder;
mod packet;
mod reading;
mod sensor_id;

pub use device::Device;
pub use folder::{Folder, TagRef};
pub use packet::Packet;
pub use reading::{Reading, SENSOR_ID_FIELD};
pub use sensor_id::SensorId;
