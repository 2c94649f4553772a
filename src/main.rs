use gymnasium::*;
use mdp_dp::envs::frozen_lake::*;
use mdp_dp::*;
use std::env;
use std::rc::Rc;
use tracing::info;

fn print_solution(name: &str, mdp: &dyn Mdp, solver: &dyn MdpSolver) {
    let v_star = (0..mdp.n_s()).map(|s| solver.v_star(s)).collect::<Vec<_>>();
    println!("{name} v*: {v_star:?}");
    let pi_star = (0..mdp.n_s()).map(|s| solver.pi_star(s)).collect::<Vec<_>>();
    println!("{name} π*: {pi_star:?}");
    let mut q_star = Vec::new();
    for s in 0..mdp.n_s() {
        for a in 0..mdp.n_a() {
            q_star.push(solver.q_star(s, a))
        }
    }
    println!("{name} q*: {q_star:?}");
}

fn main() -> MdpResult<()> {
    tracing_subscriber::fmt::init();

    let config = match env::var("MDP_DP_CONFIG") {
        Ok(path) => SolverConfig::load(path)?,
        Err(_) => SolverConfig::default(),
    };
    info!(?config, "solver config");

    let fl = FrozenLake::new(&MAP_4X4, true)?;
    let desc = fl.desc().to_vec();
    let start_state = fl.start_state();
    let fl = Rc::new(fl);
    let mdp = Rc::clone(&fl) as Rc<dyn Mdp>;

    let pi = &mut PolicyIteration::new(Rc::clone(&mdp), config);
    let rounds = pi.exec()?;
    println!("Policy iteration: gamma {}, tol {}, rounds {rounds}", config.gamma, config.tol);
    print_solution("PI", &*mdp, &*pi);

    let vi = &mut ValueIteration::new(Rc::clone(&mdp), config);
    let sweeps = vi.exec()?;
    println!("Value iteration: gamma {}, tol {}, sweeps {sweeps}", config.gamma, config.tol);
    print_solution("VI", &*mdp, &*vi);

    if let Some(solution) = pi.solution() {
        println!("{}", fl.render_policy(&solution.policy));
    }

    let solver = Rc::new(pi.clone()) as Rc<dyn MdpSolver>;
    let policy = MdpSolverPolicy { mdp_solver: solver };
    let mut sim = ModelSimulator::new(Rc::clone(&mdp), start_state, 2718)?
        .with_name("FrozenLake-v1")
        .with_grid(&desc, &ACTION_NAMES)
        .with_max_episode_steps(100);
    let n_episodes = 100;
    let total = rollout(&mut sim, &policy, false, n_episodes)?;
    println!(
        "{}: total reward {total} over {n_episodes} episodes",
        sim.name()
    );

    Ok(())
}
