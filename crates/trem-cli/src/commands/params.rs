//! Knob and menu parameter listing.

use trem_platform::{KNOB_PARAMS, ParamDescriptor, ParameterInfo, Settings};

pub fn run() {
    println!("Knobs:");
    for desc in &KNOB_PARAMS {
        print_param(desc);
    }

    let settings = Settings::default();
    println!("\nMenu:");
    for desc in (0..settings.param_count()).filter_map(|i| settings.param_info(i)) {
        print_param(&desc);
    }
}

fn print_param(desc: &ParamDescriptor) {
    let suffix = desc.unit.suffix();
    println!(
        "  {:<12} {:<12} {}{} - {}{} (default {}{})",
        desc.string_id, desc.name, desc.min, suffix, desc.max, suffix, desc.default, suffix
    );
}
