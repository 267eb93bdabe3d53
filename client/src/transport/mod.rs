use mirage_shared::{Packet, TransportError};

/// The observer's connection to the authority. Delivery is expected to be
/// ordered and reliable, with arbitrary delay; the codec is the
/// implementation's concern.
pub trait ClientConnection {
    fn send(&mut self, packet: &Packet) -> Result<(), TransportError>;
    fn receive(&mut self) -> Result<Option<Packet>, TransportError>;
    fn is_open(&self) -> bool;
}
