use crate::Error;
use super::PrinterDescriptor;

/// Printers installed in the Windows spooler, local ones and connections
#[cfg(target_os = "windows")]
pub(crate) fn spooler_printers() -> Result<Vec<PrinterDescriptor>, Error> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use std::ptr::null_mut;
    use winapi::shared::minwindef::{DWORD, LPBYTE};
    use winapi::um::winspool::{EnumPrintersW, PRINTER_INFO_4W, PRINTER_ENUM_LOCAL, PRINTER_ENUM_CONNECTIONS};
    use super::ConnectionKind;

    let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
    let mut needed: DWORD = 0;
    let mut returned: DWORD = 0;
    unsafe {
        // First call only reports the buffer size
        EnumPrintersW(flags, null_mut(), 4, null_mut(), 0, &mut needed, &mut returned);
        if needed == 0 {
            return Ok(Vec::new());
        }
        // u64 storage keeps the structures aligned
        let mut buffer = vec![0u64; (needed as usize + 7) / 8];
        if EnumPrintersW(flags, null_mut(), 4, buffer.as_mut_ptr() as LPBYTE, needed, &mut needed, &mut returned) == 0 {
            return Err(Error::Connection(format!("EnumPrintersW failed: {}", std::io::Error::last_os_error())));
        }
        let infos = std::slice::from_raw_parts(buffer.as_ptr() as *const PRINTER_INFO_4W, returned as usize);
        let mut printers = Vec::with_capacity(infos.len());
        for info in infos {
            if info.pPrinterName.is_null() {
                continue;
            }
            let mut len = 0;
            while *info.pPrinterName.add(len) != 0 {
                len += 1;
            }
            let name = OsString::from_wide(std::slice::from_raw_parts(info.pPrinterName, len));
            printers.push(PrinterDescriptor::named(printers.len(), name.to_string_lossy(), ConnectionKind::Spooler));
        }
        Ok(printers)
    }
}

/// There is no spooler to ask outside of Windows
#[cfg(not(target_os = "windows"))]
pub(crate) fn spooler_printers() -> Result<Vec<PrinterDescriptor>, Error> {
    Ok(Vec::new())
}
