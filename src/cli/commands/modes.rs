use crate::domain::SearchMode;

pub fn cmd_modes() {
    println!("Search Modes");
    println!("{:-<50}", "");

    for mode in SearchMode::ALL {
        println!(
            "{:>2}  {:<15} \"{}\"",
            mode.ordinal(),
            mode.name(),
            mode.humanized()
        );
    }

    println!();
    println!("A mode may be given by name, number or alias, in any case.");
}
