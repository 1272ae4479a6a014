//! Generic (POSIX) error classification.
//!
//! `Errc` is the common denominator every domain maps onto. Values are the
//! platform's errno numbers, so on POSIX targets a generic code and an errno
//! share numbering and convert without a table.

use crate::string_ref::StringRef;

macro_rules! errc_table {
    ($( $(#[$doc:meta])* $variant:ident = $errno:ident : $text:literal ),* $(,)?) => {
        /// A generic error condition.
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Errc {
            Success = 0,
            /// No generic mapping exists.
            Unknown = -1,
            $( $(#[$doc])* $variant = libc::$errno, )*
        }

        impl Errc {
            /// Every condition except `Success` and `Unknown`.
            pub const ALL: &'static [Errc] = &[ $( Errc::$variant, )* ];

            /// Map a raw value; anything not in the table is `Unknown`.
            pub const fn from_raw(raw: i32) -> Errc {
                match raw {
                    0 => Errc::Success,
                    $( libc::$errno => Errc::$variant, )*
                    _ => Errc::Unknown,
                }
            }

            /// The POSIX symbol, e.g. `"ENOENT"`.
            pub const fn name(self) -> &'static str {
                match self {
                    Errc::Success => "SUCCESS",
                    Errc::Unknown => "UNKNOWN",
                    $( Errc::$variant => stringify!($errno), )*
                }
            }

            /// Description followed by a NUL terminator.
            const fn terminated(self) -> &'static str {
                match self {
                    Errc::Success => "success\0",
                    Errc::Unknown => "unknown error\0",
                    $( Errc::$variant => concat!($text, "\0"), )*
                }
            }
        }
    };
}

errc_table! {
    OperationNotPermitted = EPERM: "Operation not permitted",
    NoSuchFileOrDirectory = ENOENT: "No such file or directory",
    NoSuchProcess = ESRCH: "No such process",
    Interrupted = EINTR: "Interrupted system call",
    IoError = EIO: "Input/output error",
    NoSuchDeviceOrAddress = ENXIO: "No such device or address",
    ArgumentListTooLong = E2BIG: "Argument list too long",
    ExecutableFormatError = ENOEXEC: "Exec format error",
    BadFileDescriptor = EBADF: "Bad file descriptor",
    NoChildProcess = ECHILD: "No child processes",
    /// Also `EWOULDBLOCK` on every supported target.
    ResourceUnavailableTryAgain = EAGAIN: "Resource temporarily unavailable",
    NotEnoughMemory = ENOMEM: "Cannot allocate memory",
    PermissionDenied = EACCES: "Permission denied",
    BadAddress = EFAULT: "Bad address",
    DeviceOrResourceBusy = EBUSY: "Device or resource busy",
    FileExists = EEXIST: "File exists",
    CrossDeviceLink = EXDEV: "Invalid cross-device link",
    NoSuchDevice = ENODEV: "No such device",
    NotADirectory = ENOTDIR: "Not a directory",
    IsADirectory = EISDIR: "Is a directory",
    InvalidArgument = EINVAL: "Invalid argument",
    TooManyFilesOpenInSystem = ENFILE: "Too many open files in system",
    TooManyFilesOpen = EMFILE: "Too many open files",
    InappropriateIoControlOperation = ENOTTY: "Inappropriate ioctl for device",
    TextFileBusy = ETXTBSY: "Text file busy",
    FileTooLarge = EFBIG: "File too large",
    NoSpaceOnDevice = ENOSPC: "No space left on device",
    InvalidSeek = ESPIPE: "Illegal seek",
    ReadOnlyFileSystem = EROFS: "Read-only file system",
    TooManyLinks = EMLINK: "Too many links",
    BrokenPipe = EPIPE: "Broken pipe",
    ArgumentOutOfDomain = EDOM: "Numerical argument out of domain",
    ResultOutOfRange = ERANGE: "Numerical result out of range",
    ResourceDeadlockWouldOccur = EDEADLK: "Resource deadlock avoided",
    FilenameTooLong = ENAMETOOLONG: "File name too long",
    NoLockAvailable = ENOLCK: "No locks available",
    FunctionNotSupported = ENOSYS: "Function not implemented",
    DirectoryNotEmpty = ENOTEMPTY: "Directory not empty",
    TooManySymbolicLinkLevels = ELOOP: "Too many levels of symbolic links",
    NoMessage = ENOMSG: "No message of desired type",
    IdentifierRemoved = EIDRM: "Identifier removed",
    ProtocolError = EPROTO: "Protocol error",
    BadMessage = EBADMSG: "Bad message",
    ValueTooLarge = EOVERFLOW: "Value too large for defined data type",
    IllegalByteSequence = EILSEQ: "Invalid or incomplete multibyte or wide character",
    NotASocket = ENOTSOCK: "Socket operation on non-socket",
    DestinationAddressRequired = EDESTADDRREQ: "Destination address required",
    MessageSize = EMSGSIZE: "Message too long",
    WrongProtocolType = EPROTOTYPE: "Protocol wrong type for socket",
    NoProtocolOption = ENOPROTOOPT: "Protocol not available",
    ProtocolNotSupported = EPROTONOSUPPORT: "Protocol not supported",
    /// Also `EOPNOTSUPP` on Linux.
    NotSupported = ENOTSUP: "Operation not supported",
    AddressFamilyNotSupported = EAFNOSUPPORT: "Address family not supported by protocol",
    AddressInUse = EADDRINUSE: "Address already in use",
    AddressNotAvailable = EADDRNOTAVAIL: "Cannot assign requested address",
    NetworkDown = ENETDOWN: "Network is down",
    NetworkUnreachable = ENETUNREACH: "Network is unreachable",
    NetworkReset = ENETRESET: "Network dropped connection on reset",
    ConnectionAborted = ECONNABORTED: "Software caused connection abort",
    ConnectionReset = ECONNRESET: "Connection reset by peer",
    NoBufferSpace = ENOBUFS: "No buffer space available",
    AlreadyConnected = EISCONN: "Transport endpoint is already connected",
    NotConnected = ENOTCONN: "Transport endpoint is not connected",
    TimedOut = ETIMEDOUT: "Connection timed out",
    ConnectionRefused = ECONNREFUSED: "Connection refused",
    HostUnreachable = EHOSTUNREACH: "No route to host",
    ConnectionAlreadyInProgress = EALREADY: "Operation already in progress",
    OperationInProgress = EINPROGRESS: "Operation now in progress",
    OperationCanceled = ECANCELED: "Operation canceled",
    OwnerDead = EOWNERDEAD: "Owner died",
    StateNotRecoverable = ENOTRECOVERABLE: "State not recoverable",
    NoLink = ENOLINK: "Link has been severed",
}

impl Errc {
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Errc::Success)
    }

    /// Human-readable text for the condition. Never allocates.
    pub fn description(self) -> &'static str {
        let text = self.terminated();
        &text[..text.len() - 1]
    }

    /// The description as a NUL-terminated literal reference.
    pub const fn message(self) -> StringRef {
        StringRef::from_static_nul(self.terminated())
    }
}

impl core::fmt::Display for Errc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.description())
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Static strerror text for any errno, including ones `Errc` lacks.
        pub(crate) fn strerror(errno: i32) -> &'static str {
            nix::errno::Errno::from_raw(errno).desc()
        }
    } else {
        pub(crate) fn strerror(errno: i32) -> &'static str {
            let _ = errno;
            "unrecognized error code"
        }
    }
}
