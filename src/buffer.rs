use std::io;
use std::net::{SocketAddr, UdpSocket};

/// Fixed-capacity receive buffer for one datagram.
///
/// The capacity is a hard cap: a datagram larger than the buffer is cut at
/// the buffer boundary by the socket and the excess is lost. The buffer never
/// grows.
pub struct RecvBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl RecvBuffer {
    pub fn new(capacity: usize) -> Self {
        RecvBuffer {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Valid bytes of the last received datagram.
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Receive one datagram, replacing the previous contents.
    pub fn receive(&mut self, socket: &UdpSocket) -> io::Result<(usize, SocketAddr)> {
        self.len = 0;
        let (len, peer) = socket.recv_from(&mut self.data)?;
        self.len = len.min(self.data.len());
        Ok((self.len, peer))
    }
}
