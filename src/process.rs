//! Running an external program to completion.
//!
//! [`spawn_and_wait`] forks, replaces the child's image with the requested
//! program and blocks until the child is gone. The child tells the parent
//! whether `execvp` failed through a close-on-exec pipe: a successful exec
//! closes the pipe with nothing written, a failed one sends the errno.
//!
//! `SIGPIPE` is back to its default disposition in the child before exec.

use crate::SHELL_NAME;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execvp, fork, pipe2};
use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{Read, Write};
use std::mem::ManuallyDrop;
use std::os::fd::{FromRawFd, OwnedFd};
use thiserror::Error;

/// Why an external program did not run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// The pipe the child reports exec failures on could not be opened.
    #[error("could not create exec status pipe: {}", .0.desc())]
    Pipe(Errno),
    /// No child process was created.
    #[error("could not create a child process: {}", .0.desc())]
    Fork(Errno),
    /// The child was created but could not replace its image. The child has
    /// already reported this on stderr.
    #[error("could not execute program: {}", .0.desc())]
    Exec(Errno),
    #[error("waiting for process {pid} failed: {}", .errno.desc())]
    Wait { pid: Pid, errno: Errno },
}

/// Run `program` with `argv` (`argv[0]` included) and wait for it to exit or
/// be killed by a signal.
///
/// `program` is looked up in `PATH` the way a shell resolves bare command
/// names. The child stays the wait target while stopped: only a terminated
/// child ends the wait.
pub fn spawn_and_wait(program: &CStr, argv: &[CString]) -> Result<WaitStatus, LaunchError> {
    let (status_rx, status_tx) = status_pipe()?;

    // SAFETY: the child only calls sigaction, execvp, write(2) and _exit
    // before it is replaced or gone.
    match unsafe { fork() } {
        Err(errno) => Err(LaunchError::Fork(errno)),
        Ok(ForkResult::Child) => {
            drop(status_rx);
            // SAFETY: restores a default disposition; no handler is installed.
            let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
            let errno = match execvp(program, argv) {
                Ok(never) => match never {},
                Err(errno) => errno,
            };
            exec_failed(program, errno, status_tx)
        }
        Ok(ForkResult::Parent { child }) => {
            drop(status_tx);
            log::debug!("started {program:?} as pid {child}");
            let exec_errno = read_exec_errno(status_rx);
            let status = wait_for_exit(child)?;
            match exec_errno {
                Some(errno) => Err(LaunchError::Exec(errno)),
                None => Ok(status),
            }
        }
    }
}

/// Read and write ends of a pipe, both closed on exec.
fn status_pipe() -> Result<(OwnedFd, OwnedFd), LaunchError> {
    pipe2(OFlag::O_CLOEXEC).map_err(LaunchError::Pipe)
}

/// Child side of a failed exec: report, notify the parent, leave.
fn exec_failed(program: &CStr, errno: Errno, status_tx: OwnedFd) -> ! {
    // Raw writes to fd 2: the stderr lock may have been held by another
    // thread when the process forked.
    // SAFETY: fd 2 is only borrowed and never closed here.
    let mut stderr = ManuallyDrop::new(unsafe { File::from_raw_fd(nix::libc::STDERR_FILENO) });
    let _ = stderr.write_all(SHELL_NAME.as_bytes());
    let _ = stderr.write_all(b": ");
    let _ = stderr.write_all(program.to_bytes());
    let _ = stderr.write_all(b": ");
    let _ = stderr.write_all(errno.desc().as_bytes());
    let _ = stderr.write_all(b"\n");

    let _ = File::from(status_tx).write_all(&(errno as i32).to_ne_bytes());

    // SAFETY: terminates the child without running the parent's exit
    // handlers or destructors.
    unsafe { nix::libc::_exit(1) }
}

/// Block until the exec status pipe closes; `Some` if the child sent an errno.
fn read_exec_errno(status_rx: OwnedFd) -> Option<Errno> {
    let mut bytes = Vec::with_capacity(4);
    if let Err(e) = File::from(status_rx).read_to_end(&mut bytes) {
        log::warn!("could not read exec status from child: {e}");
        return None;
    }
    let raw: [u8; 4] = bytes.as_slice().try_into().ok()?;
    Some(Errno::from_raw(i32::from_ne_bytes(raw)))
}

fn wait_for_exit(child: Pid) -> Result<WaitStatus, LaunchError> {
    loop {
        match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status @ (WaitStatus::Exited(..) | WaitStatus::Signaled(..))) => {
                log::debug!("pid {child} finished: {status:?}");
                return Ok(status);
            }
            Ok(status) => log::debug!("pid {child} changed state, still waiting: {status:?}"),
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(LaunchError::Wait { pid: child, errno }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::fcntl::{FcntlArg, FdFlag, fcntl};
    use std::os::fd::AsRawFd;

    fn argv(args: &[&str]) -> Vec<CString> {
        args.iter().map(|a| CString::new(*a).unwrap()).collect()
    }

    fn run(args: &[&str]) -> Result<WaitStatus, LaunchError> {
        let argv = argv(args);
        spawn_and_wait(&argv[0], &argv)
    }

    #[test]
    fn test_runs_program_from_path() {
        let status = run(&["true"]).expect("true should run");
        assert!(matches!(status, WaitStatus::Exited(_, 0)));
    }

    #[test]
    fn test_passes_arguments_verbatim() {
        let status = run(&["sh", "-c", "test \"$1\" = 'a b*' && exit 7", "sh", "a b*"])
            .expect("sh should run");
        assert!(matches!(status, WaitStatus::Exited(_, 7)));
    }

    #[test]
    fn test_missing_program_is_exec_error() {
        let err = run(&["bsh-test-no-such-program"]).unwrap_err();
        assert_eq!(err, LaunchError::Exec(Errno::ENOENT));
    }

    #[test]
    fn test_non_executable_file_is_exec_error() {
        let path = std::env::temp_dir().join(format!("bsh_not_exec_{}", std::process::id()));
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let result = run(&[path_str.as_str()]);
        let _ = std::fs::remove_file(&path);

        assert_eq!(result.unwrap_err(), LaunchError::Exec(Errno::EACCES));
    }

    #[test]
    fn test_signaled_child_ends_wait() {
        let status = run(&["sh", "-c", "kill -TERM $$"]).expect("sh should run");
        assert!(matches!(status, WaitStatus::Signaled(_, Signal::SIGTERM, _)));
    }

    #[test]
    fn test_stopped_child_keeps_wait_blocking() {
        // The child stops itself; a background job resumes it, then it exits.
        let status = run(&[
            "sh",
            "-c",
            "(sleep 0.2; kill -CONT $$) & kill -STOP $$; exit 3",
        ])
        .expect("sh should run");
        assert!(matches!(status, WaitStatus::Exited(_, 3)));
    }

    #[test]
    fn test_status_pipe_is_close_on_exec() {
        let (rx, tx) = status_pipe().expect("pipe should open");
        for fd in [&rx, &tx] {
            let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFD).unwrap();
            assert!(FdFlag::from_bits_truncate(flags).contains(FdFlag::FD_CLOEXEC));
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_child_gets_default_sigpipe() {
        // The test harness itself runs with SIGPIPE ignored.
        let out = std::env::temp_dir().join(format!("bsh_sigign_{}", std::process::id()));
        let script = format!("cat /proc/self/status > '{}'", out.display());
        let status = run(&["sh", "-c", script.as_str()]).expect("sh should run");
        let report = std::fs::read_to_string(&out).unwrap();
        let _ = std::fs::remove_file(&out);

        assert!(matches!(status, WaitStatus::Exited(_, 0)));
        let mask = report
            .lines()
            .find_map(|l| l.strip_prefix("SigIgn:"))
            .map(|hex| u64::from_str_radix(hex.trim(), 16).unwrap())
            .expect("status should list ignored signals");
        let sigpipe_bit = 1u64 << (Signal::SIGPIPE as i32 - 1);
        assert_eq!(mask & sigpipe_bit, 0, "SIGPIPE ignored in child: {mask:#x}");
    }

    #[test]
    fn test_error_messages_describe_errno() {
        assert_eq!(
            LaunchError::Pipe(Errno::EMFILE).to_string(),
            format!("could not create exec status pipe: {}", Errno::EMFILE.desc())
        );
        assert_eq!(
            LaunchError::Fork(Errno::EAGAIN).to_string(),
            format!("could not create a child process: {}", Errno::EAGAIN.desc())
        );
        assert_eq!(
            LaunchError::Exec(Errno::ENOENT).to_string(),
            "could not execute program: No such file or directory"
        );
    }
}
