use mirage_shared::{Packet, TransportError};

/// Listening side of the transport boundary. Implementations accept
/// observer connections however they like (sockets, channels, in-memory
/// pairs for tests); the Server only polls.
pub trait Socket {
    /// The next pending observer connection, if one is waiting
    fn accept(&mut self) -> Option<Box<dyn Connection>>;
}

/// An established connection to one observer. Delivery is expected to be
/// ordered and reliable, with arbitrary delay.
pub trait Connection {
    fn send(&mut self, packet: &Packet) -> Result<(), TransportError>;
    fn receive(&mut self) -> Result<Option<Packet>, TransportError>;
    fn is_open(&self) -> bool;
}
