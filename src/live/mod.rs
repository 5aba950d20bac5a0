pub(crate) mod render_loop;
