use sysinfo::System;

/// Logical CPUs seen by the host, never less than one.
pub fn cpu_cores() -> usize {
    let mut sys = System::new_all();
    sys.refresh_all();

    sys.cpus().len().max(1)
}
