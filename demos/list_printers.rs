use tsclib::{TscPrinter, LibraryConfig, PortTarget, Error, backend::NativeBackend};

fn main() -> Result<(), Error> {
    env_logger::init();
    let backend = NativeBackend::load(&LibraryConfig::default())?;
    let mut printer = TscPrinter::new(backend);

    let printers = printer.list_printers()?;
    if printers.is_empty() {
        println!("No printers found");
        return Ok(());
    }
    for descriptor in printers.iter() {
        println!("{}: {} ({:?})", descriptor.index, descriptor.name, descriptor.kind);
    }

    printer.open(PortTarget::Index(0))?;
    println!("Opened {}", printers[0].name);
    printer.close();
    Ok(())
}
