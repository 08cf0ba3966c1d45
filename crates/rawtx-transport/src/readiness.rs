//! Write-readiness probing for emission loops.
//!
//! `ppoll` is used instead of `poll` because the probe window is measured in
//! microseconds, and instead of `select` so descriptors above `FD_SETSIZE`
//! stay usable.

use std::os::fd::BorrowedFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{ppoll, PollFd, PollFlags};
use nix::sys::time::TimeSpec;

/// Waits at most `timeout` for `fd` to accept a write.
///
/// An interrupted wait counts as "not writable yet" rather than an error.
pub fn poll_writable(fd: BorrowedFd<'_>, timeout: Duration) -> nix::Result<bool> {
    let mut fds = [PollFd::new(fd, PollFlags::POLLOUT)];
    match ppoll(&mut fds, Some(TimeSpec::from_duration(timeout)), None) {
        Ok(0) => Ok(false),
        Ok(_) => Ok(fds[0]
            .revents()
            .is_some_and(|events| events.contains(PollFlags::POLLOUT))),
        Err(Errno::EINTR) => Ok(false),
        Err(errno) => Err(errno),
    }
}
