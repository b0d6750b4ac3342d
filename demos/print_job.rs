use tsclib::{TscPrinter, LibraryConfig, PortTarget, StatusCode, Error, ErrorKind, backend::NativeBackend};
use tsclib::label::{LabelConfiguration, InternalFontText, Barcode, WindowsFontText};

fn print_test_label() -> Result<(), Error> {
    let backend = NativeBackend::load(&LibraryConfig::default())?;
    let mut printer = TscPrinter::new(backend);
    println!("{}", printer.about_info()?);

    printer.with_session(PortTarget::Usb, |printer| {
        match printer.get_status()? {
            StatusCode::Ready => println!("Printer ready"),
            StatusCode::Unknown => println!("WARN: printer status could not be read"),
            other => println!("WARN: printer reports {} (status code {})", other.name(), other.code())
        }

        let label = LabelConfiguration::builder(70.0, 40.0)
            .speed(4.0)
            .density(10)
            .gap(3.0, 0.0)
            .build();
        printer.setup_label(&label)?;
        printer.clear_buffer()?;
        printer.add_internal_font_text(&InternalFontText::new(50, 50, "3", "Internal Font Test"))?;
        printer.add_barcode(&Barcode::new(50, 100, "128", 70, "TEST12345"))?;
        printer.add_windows_font_text(&WindowsFontText::new(50, 250, 48, "Arial", "Windows Arial Test"))?;
        printer.send_raw_command("BOX 50,350,600,450,3")?;
        printer.send_raw_command_utf8("TEXT 50,500,\"KAIU.TTF\",0,12,12,\"標楷體 UTF-8 測試\"")?;
        printer.print_label(1, 1)
    })
}

fn main() {
    env_logger::init();
    match print_test_label() {
        Ok(()) => println!("Label sent"),
        Err(e) => match e.kind() {
            ErrorKind::Initialization => eprintln!("Could not load the printer library: {}", e),
            ErrorKind::Connection => eprintln!("Could not reach the printer: {}", e),
            ErrorKind::Printer => eprintln!("The printer refused the job: {}", e),
            ErrorKind::Other => eprintln!("Unexpected error: {}", e)
        }
    }
}
