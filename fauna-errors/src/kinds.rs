use crate::traits::{ErrorKind, Sealed};

macro_rules! define_errors {
    ($( $id:ident = $code:literal / $mask:literal; )*) => {
        $(
            pub struct $id;

            impl Sealed for $id {
                const CODE: u32 = $code;
                const NAME: &'static str = stringify!($id);
                fn is_superclass_of(code: u32) -> bool {
                    code & $mask == $code
                }
            }

            impl ErrorKind for $id {}
        )*

        pub(crate) fn error_name(code: u32) -> &'static str {
            match code {
                $( $code => stringify!($id), )*
                _ => "UnknownError",
            }
        }
    }
}

define_errors! {
    ClientError = 0x01_00_00_00 / 0xFF_00_00_00;
    ProtocolEncodingError = 0x01_01_00_00 / 0xFF_FF_00_00;
    ClientTimeoutError = 0x01_02_00_00 / 0xFF_FF_00_00;
    TransportError = 0x01_03_00_00 / 0xFF_FF_00_00;
    ConfigurationError = 0x01_04_00_00 / 0xFF_FF_00_00;
    InterfaceError = 0x01_05_00_00 / 0xFF_FF_00_00;
    ValueDecodeError = 0x01_06_00_00 / 0xFF_FF_00_00;

    ServerError = 0x02_00_00_00 / 0xFF_00_00_00;
    BadRequestError = 0x02_01_00_00 / 0xFF_FF_00_00;
    UnauthorizedError = 0x02_02_00_00 / 0xFF_FF_00_00;
    PermissionDeniedError = 0x02_03_00_00 / 0xFF_FF_00_00;
    NotFoundError = 0x02_04_00_00 / 0xFF_FF_00_00;
    InternalServerError = 0x02_05_00_00 / 0xFF_FF_00_00;
    UnavailableError = 0x02_06_00_00 / 0xFF_FF_00_00;
    UnknownServerError = 0x02_FF_00_00 / 0xFF_FF_00_00;
}
