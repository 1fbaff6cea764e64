use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let rows: usize = ctx.outcomes.iter().map(|o| o.rows).sum();

    let mut out = String::new();
    out.push_str(&format!("neurosim v{}\n", version));
    out.push_str(&format!(
        "Input: {} rows, {} patients\n",
        ctx.rows_read, ctx.patients_read
    ));
    out.push_str(&format!(
        "Output: {} files, {} rows in {}\n",
        ctx.outcomes.len(),
        rows,
        ctx.output.out_dir.display()
    ));

    if ctx.failures.is_empty() {
        out.push_str("Failures: none\n");
    } else {
        let ids: Vec<String> = ctx.failures.iter().map(|f| f.id.to_string()).collect();
        out.push_str(&format!("Failures: {}\n", ids.join(", ")));
    }

    out
}
