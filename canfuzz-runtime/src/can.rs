use std::{io, os::unix::prelude::*};

use async_trait::async_trait;
use socket2::SockAddr;
use tokio::io::unix::AsyncFd;

use crate::driver::Transport;
use crate::frame::Frame;

mod sys {
    pub(super) fn if_nametoindex(iface_name: &str) -> i32 {
        let iface_name_raw = std::ffi::CString::new(iface_name).unwrap();

        unsafe { libc::if_nametoindex(iface_name_raw.as_ptr()) as i32 }
    }
}

pub struct SockAddrCAN {
    pub ifindex: i32,
}

impl SockAddrCAN {
    pub fn new(ifname: &str) -> Self {
        Self {
            ifindex: sys::if_nametoindex(ifname),
        }
    }
}

impl From<&SockAddrCAN> for SockAddr {
    fn from(value: &SockAddrCAN) -> SockAddr {
        let mut sockaddr_can =
            unsafe { std::mem::MaybeUninit::<libc::sockaddr_can>::zeroed().assume_init() };
        sockaddr_can.can_family = libc::AF_CAN as u16;
        sockaddr_can.can_ifindex = value.ifindex;

        let mut storage = std::mem::MaybeUninit::<libc::sockaddr_storage>::zeroed();
        unsafe { (storage.as_mut_ptr() as *mut libc::sockaddr_can).write(sockaddr_can) };

        unsafe {
            SockAddr::new(
                storage.assume_init(),
                std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t,
            )
        }
    }
}

pub struct CANSocket(AsyncFd<socket2::Socket>);

impl CANSocket {
    /// Binds this socket to the specified address and interface.
    pub fn bind(address: impl Into<SockAddr>) -> io::Result<Self> {
        let socket = socket2::Socket::new_raw(
            libc::AF_CAN.into(),
            socket2::Type::RAW,
            Some(libc::CAN_RAW.into()),
        )?;

        socket.bind(&address.into())?;
        socket.set_nonblocking(true)?;

        Ok(Self(AsyncFd::new(socket)?))
    }

    /// Sends a single frame on the socket to the CAN bus. On success,
    /// returns the number of bytes written.
    pub async fn send(&self, frame: &Frame) -> io::Result<usize> {
        loop {
            let mut guard = self.0.writable().await?;

            let mut can_frame =
                unsafe { std::mem::MaybeUninit::<libc::can_frame>::zeroed().assume_init() };

            // Standard frame format, no EFF flag.
            can_frame.can_id = frame.id().as_raw() as u32;
            can_frame.can_dlc = frame.len() as u8;
            can_frame.data[..frame.len()].copy_from_slice(frame.pdu());

            let buf = unsafe {
                std::slice::from_raw_parts(
                    &can_frame as *const libc::can_frame as *const u8,
                    std::mem::size_of::<libc::can_frame>(),
                )
            };

            match guard.try_io(|inner| inner.get_ref().send(buf)) {
                Ok(result) => return result,
                Err(_would_block) => continue,
            }
        }
    }

    /// Shuts down the read, write, or both halves of this connection.
    ///
    /// This function will cause all pending and future I/O on the specified
    /// portions to return immediately with an appropriate value.
    #[inline]
    pub fn shutdown(&self, how: std::net::Shutdown) -> io::Result<()> {
        self.0.get_ref().shutdown(how)
    }

    /// Get the value of the `SO_ERROR` option on this socket.
    ///
    /// This will retrieve the stored error in the underlying socket, clearing
    /// the field in the process. This can be useful for checking errors between
    /// calls.
    #[inline]
    pub fn take_error(&self) -> io::Result<Option<io::Error>> {
        self.0.get_ref().take_error()
    }
}

#[async_trait]
impl Transport for CANSocket {
    async fn transmit(&self, frame: &Frame) -> io::Result<usize> {
        self.send(frame).await
    }
}

impl AsRawFd for CANSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
