use readably::Config;

use crate::ExclusionArgs;

pub fn cmd_exclusions(config: &Config, args: &ExclusionArgs) {
    let list = super::exclusion_list(config, args);
    if list.is_empty() {
        println!("(no excluded tags)");
        return;
    }
    for tag in list.iter() {
        println!("{tag}");
    }
}
