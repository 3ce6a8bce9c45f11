use css_sheet_parser::parse_stylesheet;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("USAGE: cli <path>");
        return;
    };
    let Ok(input) = std::fs::read_to_string(&path) else {
        eprintln!("Failed to read file: {}", path);
        return;
    };
    let (sheet, warnings) = parse_stylesheet(&input);
    println!("{}", sheet);
    if warnings.is_empty() {
        eprintln!("No warnings found");
    } else {
        eprintln!("Warnings:");
        for warning in warnings {
            eprintln!("{:?}", warning);
        }
    }
}
